//! Audio endpoint enumeration and volume control

#[cfg(windows)]
mod core_audio;
mod directory;
mod volume;

#[cfg(windows)]
pub use core_audio::CoreAudioBackend;
pub use directory::{DeviceDirectory, DeviceHandle};
pub use volume::{format_volume_label, VolumeController, VolumeTarget};

use crate::error::Result;
use std::fmt;

/// Endpoint data-flow direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Output (speakers, headphones)
    Render,
    /// Input (microphones)
    Capture,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Render => write!(f, "output"),
            Direction::Capture => write!(f, "input"),
        }
    }
}

/// Endpoint state as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    Active,
    Disabled,
    NotPresent,
    Unplugged,
}

/// Information about an audio endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Opaque OS device ID
    pub id: String,
    /// Human-readable device name
    pub name: String,
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// An endpoint together with its state at enumeration time
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub descriptor: DeviceDescriptor,
    pub state: EndpointState,
}

/// OS audio subsystem seam
///
/// Implementations look devices up by id on every call; no live handle is
/// kept between calls.
pub trait AudioBackend {
    /// All endpoints for a direction, whatever their state
    fn endpoints(&self, direction: Direction) -> Result<Vec<Endpoint>>;

    /// The OS default endpoint for a direction
    fn default_endpoint(&self, direction: Direction) -> Result<DeviceDescriptor>;

    /// State of a device by id; `DeviceNotFound` if the OS does not know it
    fn endpoint_state(&self, device_id: &str) -> Result<EndpointState>;

    /// Master volume scalar (0.0 - 1.0)
    fn master_volume(&self, device_id: &str) -> Result<f32>;

    /// Set master volume scalar (0.0 - 1.0)
    fn set_master_volume(&self, device_id: &str, scalar: f32) -> Result<()>;
}
