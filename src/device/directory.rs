//! Active endpoint directory

use super::{AudioBackend, DeviceDescriptor, Direction, EndpointState};
use crate::error::{Result, WidgetError};
use tracing::debug;

/// A device id verified active at resolve time
///
/// Not a cached OS object: every operation on it looks the device up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    id: String,
    direction: Direction,
}

impl DeviceHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Enumerates and resolves active audio endpoints
pub struct DeviceDirectory<B> {
    backend: B,
}

impl<B: AudioBackend> DeviceDirectory<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Active endpoints for a direction, in OS order
    pub fn enumerate(&self, direction: Direction) -> Result<Vec<DeviceDescriptor>> {
        let endpoints = self.backend.endpoints(direction)?;
        let total = endpoints.len();

        let active: Vec<_> = endpoints
            .into_iter()
            .filter(|e| e.state == EndpointState::Active)
            .map(|e| e.descriptor)
            .collect();

        debug!(
            "Found {} active {} devices ({} reported)",
            active.len(),
            direction,
            total
        );
        Ok(active)
    }

    /// The OS default endpoint for a direction
    pub fn default_device(&self, direction: Direction) -> Result<DeviceDescriptor> {
        self.backend.default_endpoint(direction)
    }

    /// Map an id back to a device, failing if it is gone or no longer active
    pub fn resolve(&self, direction: Direction, device_id: &str) -> Result<DeviceHandle> {
        match self.backend.endpoint_state(device_id)? {
            EndpointState::Active => Ok(DeviceHandle {
                id: device_id.to_string(),
                direction,
            }),
            state => {
                debug!("Device {} is {:?}", device_id, state);
                Err(WidgetError::DeviceNotFound(device_id.to_string()))
            }
        }
    }

    /// Resolve the current OS default endpoint
    pub fn resolve_default(&self, direction: Direction) -> Result<DeviceHandle> {
        let default = self.default_device(direction)?;
        self.resolve(direction, &default.id)
    }
}
