//! Audio endpoint access using Windows Core Audio API

use super::{AudioBackend, DeviceDescriptor, Direction, Endpoint, EndpointState};
use crate::error::{Result, WidgetError};
use tracing::{debug, info};
use windows::{
    core::PCWSTR,
    Win32::{
        Devices::FunctionDiscovery::PKEY_Device_FriendlyName,
        Media::Audio::{
            eCapture, eConsole, eMultimedia, eRender, EDataFlow, ERole, IMMDevice,
            IMMDeviceEnumerator, MMDeviceEnumerator, DEVICE_STATE, DEVICE_STATEMASK_ALL,
            DEVICE_STATE_ACTIVE, DEVICE_STATE_DISABLED, DEVICE_STATE_NOTPRESENT,
        },
        Media::Audio::Endpoints::IAudioEndpointVolume,
        System::Com::{
            CoCreateInstance, CoInitializeEx, CoTaskMemFree, CLSCTX_ALL,
            COINIT_APARTMENTTHREADED,
        },
    },
};

/// Core Audio backend wrapping the Windows MMDevice API
///
/// Lives on the UI thread; devices are looked up by id on every call.
pub struct CoreAudioBackend {
    enumerator: IMMDeviceEnumerator,
}

impl CoreAudioBackend {
    /// Create a new backend
    ///
    /// # Safety
    /// This initializes COM for the calling thread if not already initialized
    pub fn new() -> Result<Self> {
        unsafe {
            // The window loop may already own an apartment; ignore mode mismatch
            let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);

            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)?;

            info!("Core Audio backend initialized");

            Ok(Self { enumerator })
        }
    }

    fn data_flow(direction: Direction) -> EDataFlow {
        match direction {
            Direction::Render => eRender,
            Direction::Capture => eCapture,
        }
    }

    fn default_role(direction: Direction) -> ERole {
        match direction {
            Direction::Render => eMultimedia,
            Direction::Capture => eConsole,
        }
    }

    /// Get a device by its ID
    fn get_device(&self, device_id: &str) -> Result<IMMDevice> {
        unsafe {
            let id_wide: Vec<u16> = device_id.encode_utf16().chain(std::iter::once(0)).collect();
            self.enumerator
                .GetDevice(PCWSTR(id_wide.as_ptr()))
                .map_err(|_| WidgetError::DeviceNotFound(device_id.to_string()))
        }
    }

    fn endpoint_volume(&self, device_id: &str) -> Result<IAudioEndpointVolume> {
        let device = self.get_device(device_id)?;
        unsafe {
            device
                .Activate::<IAudioEndpointVolume>(CLSCTX_ALL, None)
                .map_err(|e| WidgetError::device_error(device_id, e.to_string()))
        }
    }

    /// Get device descriptor from an IMMDevice
    fn get_descriptor(device: &IMMDevice) -> Result<DeviceDescriptor> {
        unsafe {
            let id_ptr = device.GetId()?;
            let id = PCWSTR(id_ptr.0).to_string();
            CoTaskMemFree(Some(id_ptr.0 as *const _));
            let id = id.map_err(|e| WidgetError::device_error("unknown", e.to_string()))?;

            let store = device
                .OpenPropertyStore(windows::Win32::System::Com::StructuredStorage::STGM_READ)?;
            let name_prop = store.GetValue(&PKEY_Device_FriendlyName)?;
            let name =
                prop_variant_to_string(&name_prop).unwrap_or_else(|| "Unknown Device".to_string());

            Ok(DeviceDescriptor { id, name })
        }
    }
}

impl AudioBackend for CoreAudioBackend {
    fn endpoints(&self, direction: Direction) -> Result<Vec<Endpoint>> {
        unsafe {
            let collection = self
                .enumerator
                .EnumAudioEndpoints(Self::data_flow(direction), DEVICE_STATEMASK_ALL)?;

            let count = collection.GetCount()?;
            debug!("Found {} {} endpoints", count, direction);

            let mut endpoints = Vec::with_capacity(count as usize);

            for i in 0..count {
                let Ok(device) = collection.Item(i) else {
                    continue;
                };
                let state = match device.GetState() {
                    Ok(state) => map_state(state),
                    Err(_) => continue,
                };
                // Not-present endpoints often have no readable property store
                if let Ok(descriptor) = Self::get_descriptor(&device) {
                    endpoints.push(Endpoint { descriptor, state });
                }
            }

            Ok(endpoints)
        }
    }

    fn default_endpoint(&self, direction: Direction) -> Result<DeviceDescriptor> {
        let device = unsafe {
            self.enumerator
                .GetDefaultAudioEndpoint(Self::data_flow(direction), Self::default_role(direction))
                .map_err(|_| WidgetError::NoDefaultDevice(direction))?
        };
        Self::get_descriptor(&device)
    }

    fn endpoint_state(&self, device_id: &str) -> Result<EndpointState> {
        let device = self.get_device(device_id)?;
        let state = unsafe {
            device
                .GetState()
                .map_err(|_| WidgetError::DeviceNotFound(device_id.to_string()))?
        };
        Ok(map_state(state))
    }

    fn master_volume(&self, device_id: &str) -> Result<f32> {
        let volume = self.endpoint_volume(device_id)?;
        unsafe {
            volume
                .GetMasterVolumeLevelScalar()
                .map_err(|e| WidgetError::device_error(device_id, e.to_string()))
        }
    }

    fn set_master_volume(&self, device_id: &str, scalar: f32) -> Result<()> {
        let volume = self.endpoint_volume(device_id)?;
        unsafe {
            volume
                .SetMasterVolumeLevelScalar(scalar.clamp(0.0, 1.0), std::ptr::null())
                .map_err(|e| WidgetError::device_error(device_id, e.to_string()))
        }
    }
}

fn map_state(state: DEVICE_STATE) -> EndpointState {
    if state == DEVICE_STATE_ACTIVE {
        EndpointState::Active
    } else if state == DEVICE_STATE_DISABLED {
        EndpointState::Disabled
    } else if state == DEVICE_STATE_NOTPRESENT {
        EndpointState::NotPresent
    } else {
        EndpointState::Unplugged
    }
}

/// Extract string from PROPVARIANT
fn prop_variant_to_string(
    prop: &windows::Win32::System::Com::StructuredStorage::PROPVARIANT,
) -> Option<String> {
    unsafe {
        // Check if it's a string type (VT_LPWSTR = 31)
        if prop.Anonymous.Anonymous.vt == windows::Win32::System::Variant::VT_LPWSTR {
            let pwsz = prop.Anonymous.Anonymous.Anonymous.pwszVal;
            if !pwsz.0.is_null() {
                return PCWSTR(pwsz.0).to_string().ok();
            }
        }
        None
    }
}
