//! In-memory doubles for the OS and network seams

use crate::autostart::RunKeyStore;
use crate::device::{AudioBackend, DeviceDescriptor, Direction, Endpoint, EndpointState};
use crate::error::{Result, WidgetError};
use crate::weather::{HttpResponse, WeatherTransport};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

struct FakeDevice {
    direction: Direction,
    descriptor: DeviceDescriptor,
    state: EndpointState,
    scalar: f32,
}

/// Audio subsystem with a fixed device table
#[derive(Default)]
pub struct FakeAudio {
    devices: RefCell<Vec<FakeDevice>>,
    defaults: HashMap<Direction, String>,
    fail_writes: bool,
}

impl FakeAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(self, direction: Direction, id: &str, name: &str, state: EndpointState) -> Self {
        self.devices.borrow_mut().push(FakeDevice {
            direction,
            descriptor: DeviceDescriptor {
                id: id.to_string(),
                name: name.to_string(),
            },
            state,
            scalar: 1.0,
        });
        self
    }

    pub fn with_default(mut self, direction: Direction, id: &str) -> Self {
        self.defaults.insert(direction, id.to_string());
        self
    }

    pub fn with_volume(self, id: &str, scalar: f32) -> Self {
        if let Some(d) = self.devices.borrow_mut().iter_mut().find(|d| d.descriptor.id == id) {
            d.scalar = scalar;
        }
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn remove(&self, id: &str) {
        self.devices.borrow_mut().retain(|d| d.descriptor.id != id);
    }

    pub fn scalar(&self, id: &str) -> f32 {
        self.devices
            .borrow()
            .iter()
            .find(|d| d.descriptor.id == id)
            .map(|d| d.scalar)
            .unwrap_or(f32::NAN)
    }
}

impl AudioBackend for FakeAudio {
    fn endpoints(&self, direction: Direction) -> Result<Vec<Endpoint>> {
        Ok(self
            .devices
            .borrow()
            .iter()
            .filter(|d| d.direction == direction)
            .map(|d| Endpoint {
                descriptor: d.descriptor.clone(),
                state: d.state,
            })
            .collect())
    }

    fn default_endpoint(&self, direction: Direction) -> Result<DeviceDescriptor> {
        let id = self
            .defaults
            .get(&direction)
            .ok_or(WidgetError::NoDefaultDevice(direction))?;
        self.devices
            .borrow()
            .iter()
            .find(|d| &d.descriptor.id == id)
            .map(|d| d.descriptor.clone())
            .ok_or(WidgetError::NoDefaultDevice(direction))
    }

    fn endpoint_state(&self, device_id: &str) -> Result<EndpointState> {
        self.devices
            .borrow()
            .iter()
            .find(|d| d.descriptor.id == device_id)
            .map(|d| d.state)
            .ok_or_else(|| WidgetError::DeviceNotFound(device_id.to_string()))
    }

    fn master_volume(&self, device_id: &str) -> Result<f32> {
        self.devices
            .borrow()
            .iter()
            .find(|d| d.descriptor.id == device_id)
            .map(|d| d.scalar)
            .ok_or_else(|| WidgetError::DeviceNotFound(device_id.to_string()))
    }

    fn set_master_volume(&self, device_id: &str, scalar: f32) -> Result<()> {
        if self.fail_writes {
            return Err(WidgetError::device_error(device_id, "device disconnected"));
        }
        let mut devices = self.devices.borrow_mut();
        let device = devices
            .iter_mut()
            .find(|d| d.descriptor.id == device_id)
            .ok_or_else(|| WidgetError::DeviceNotFound(device_id.to_string()))?;
        device.scalar = scalar;
        Ok(())
    }
}

/// Canned transport that records every request
pub struct MockTransport {
    responder: Box<dyn Fn(&[(&str, String)]) -> Result<HttpResponse> + Send + Sync>,
    calls: AtomicUsize,
    last_query: Mutex<Vec<(String, String)>>,
}

impl MockTransport {
    /// Answer every request with `status` and `body`
    pub fn ok(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::responding(move |_| {
            Ok(HttpResponse {
                status,
                body: body.clone(),
            })
        })
    }

    /// Fail every request with a timeout
    pub fn timing_out() -> Self {
        Self::responding(|_| Err(WidgetError::Timeout))
    }

    pub fn responding(
        f: impl Fn(&[(&str, String)]) -> Result<HttpResponse> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(f),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Vec<(String, String)> {
        self.last_query.lock().clone()
    }
}

impl WeatherTransport for MockTransport {
    fn get(&self, _url: &str, query: &[(&str, String)]) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock() = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        (self.responder)(query)
    }
}

/// Run key backed by a map
#[derive(Default)]
pub struct MemoryRunKey {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryRunKey {
    pub fn value(&self, name: &str) -> Option<String> {
        self.values.borrow().get(name).cloned()
    }
}

impl RunKeyStore for MemoryRunKey {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.values.borrow_mut().remove(name);
        Ok(())
    }
}
