use rodio::cpal::{
    self, Device, Host,
    traits::{DeviceTrait, HostTrait},
};
use rodio::{OutputStream, OutputStreamHandle};

use crate::PlayerError;

/// Returns the names of all output devices available on the given host.
///
/// Devices whose name cannot be read are skipped.
pub fn list_output_device_names(host: &Host) -> Result<Vec<String>, PlayerError> {
    Ok(host
        .output_devices()?
        .filter_map(|device| device.name().ok())
        .collect())
}

/// Returns the names of the output devices of the default host.
pub fn default_output_device_names() -> Result<Vec<String>, PlayerError> {
    list_output_device_names(&cpal::default_host())
}

/// Retrieves an output device by its name on the given host.
pub fn find_output_device(host: &Host, name: &str) -> Result<Option<Device>, PlayerError> {
    Ok(host
        .output_devices()?
        .find(|device| device.name().is_ok_and(|device_name| device_name == name)))
}

/// Opens an output stream on the device with the given name, or on the host's
/// default device when no name is given or the device is missing.
///
/// The returned [`OutputStream`] must be kept alive for as long as sound
/// should be produced; dropping it silences every sink created from the
/// handle.
pub fn open_output_stream(
    device_name: Option<&str>,
) -> Result<(OutputStream, OutputStreamHandle), PlayerError> {
    let host = cpal::default_host();
    if let Some(name) = device_name {
        match find_output_device(&host, name)? {
            Some(device) => {
                log::info!("Opening output stream on {name:?}");
                return Ok(OutputStream::try_from_device(&device)?);
            }
            None => log::warn!("Output device {name:?} not found, using the default one"),
        }
    }

    Ok(OutputStream::try_default()?)
}
