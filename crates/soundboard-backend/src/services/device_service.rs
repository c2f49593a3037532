use soundboard_bridge::MessageFromBackend;

use crate::app::AppContext;
use crate::output::AudioSource;

/// Handles an incoming output devices list request (see
/// [`soundboard_bridge::MessageToBackend::OutputDevicesListRequest`]).
pub async fn handle_output_devices_list_request<S: AudioSource>(context: &mut AppContext<S>) {
    match soundboard_audio::device::default_output_device_names() {
        Ok(names) => {
            context
                .send(MessageFromBackend::OutputDevicesListResponse(names))
                .await;
        }
        Err(e) => context
            .status()
            .error(format!("Could not list output devices: {e}")),
    }
}
