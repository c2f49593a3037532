//! Backend service handlers for frontend-driven requests.
//!
//! Each handler operates on the [`crate::app::AppContext`] owned by the event
//! loop and reports its outcome back to the frontend as a status or a
//! response message.

pub mod board_service;
pub mod device_service;
pub mod playback_service;
