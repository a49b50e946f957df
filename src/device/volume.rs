//! Master volume of the selected output device

use super::{AudioBackend, DeviceDirectory, DeviceHandle, Direction};
use crate::error::Result;
use tracing::debug;

/// Which device a volume write ended up on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeTarget {
    /// The explicitly selected device
    Selected(String),
    /// No selection; the system default output was written instead
    SystemDefault(String),
}

/// Slider label for a percentage, truncated toward zero
pub fn format_volume_label(percent: f32) -> String {
    format!("{}%", percent as i32)
}

/// Reads and writes master volume as a 0-100 percentage
pub struct VolumeController<'a, B> {
    directory: &'a DeviceDirectory<B>,
}

impl<'a, B: AudioBackend> VolumeController<'a, B> {
    pub fn new(directory: &'a DeviceDirectory<B>) -> Self {
        Self { directory }
    }

    /// Current master volume in percent
    pub fn get_percent(&self, device: &DeviceHandle) -> Result<f32> {
        let scalar = self.directory.backend().master_volume(device.id())?;
        Ok((scalar * 100.0).clamp(0.0, 100.0))
    }

    /// Write master volume in percent
    ///
    /// With no device selected the current system default output is written.
    /// The slider therefore works before a choice is made, but the written
    /// device may differ from what the combo box shows.
    pub fn set_percent(&self, device: Option<&DeviceHandle>, percent: f32) -> Result<VolumeTarget> {
        let scalar = percent.clamp(0.0, 100.0) / 100.0;

        let target = match device {
            Some(handle) => {
                // Re-resolve: the device may have vanished since selection
                let handle = self.directory.resolve(handle.direction(), handle.id())?;
                VolumeTarget::Selected(handle.id().to_string())
            }
            None => {
                let default = self.directory.resolve_default(Direction::Render)?;
                VolumeTarget::SystemDefault(default.id().to_string())
            }
        };

        let id = match &target {
            VolumeTarget::Selected(id) | VolumeTarget::SystemDefault(id) => id,
        };
        self.directory.backend().set_master_volume(id, scalar)?;
        debug!("Volume of {} set to {:.2}", id, scalar);

        Ok(target)
    }
}
