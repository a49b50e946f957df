//! Where each failure becomes visible
//!
//! Every OS- and network-facing operation returns an explicit error; this
//! table alone decides whether the user sees it.

use super::state::WidgetState;
use crate::error::WidgetError;
use tracing::{info, warn};

pub const NOTE_LOADING: &str = "Loading...";
pub const NOTE_CITY_SAVED: &str = "City saved";
pub const NOTE_API_KEY_MISSING: &str = "Set the OpenWeather API key in the settings file.";
pub const NOTE_DEVICE_GONE: &str = "The selected device is no longer available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadSettings,
    SaveSettings,
    EnumerateDevices,
    ResolveDevice,
    ReadVolume,
    WriteVolume,
    FetchWeather,
    ToggleAutostart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Logged only
    Silent,
    WeatherNote,
    DeviceNote,
    Notice,
}

pub fn surface(op: Operation, err: &WidgetError) -> Surface {
    match (op, err) {
        (_, WidgetError::DeviceNotFound(_)) => Surface::DeviceNote,
        (Operation::FetchWeather, _) => Surface::WeatherNote,
        (Operation::ToggleAutostart, _) => Surface::Notice,
        (Operation::ResolveDevice, _) => Surface::DeviceNote,
        (Operation::LoadSettings, _)
        | (Operation::SaveSettings, _)
        | (Operation::EnumerateDevices, _)
        | (Operation::ReadVolume, _)
        | (Operation::WriteVolume, _) => Surface::Silent,
    }
}

pub fn message(op: Operation, err: &WidgetError) -> String {
    match (op, err) {
        (_, WidgetError::MissingApiKey) => NOTE_API_KEY_MISSING.to_string(),
        (_, WidgetError::DeviceNotFound(_)) => NOTE_DEVICE_GONE.to_string(),
        (Operation::FetchWeather, e) => format!("Weather error: {}", e),
        (Operation::ToggleAutostart, e) => format!("Autostart change failed: {}", e),
        (_, e) => e.to_string(),
    }
}

/// Log `err` and route its message to the state field the table names
pub fn report(state: &mut WidgetState, op: Operation, err: &WidgetError) {
    let target = surface(op, err);
    match target {
        Surface::Silent => {
            warn!("{:?} failed: {}", op, err);
            return;
        }
        _ => info!("{:?} failed ({:?}): {}", op, target, err),
    }

    let text = message(op, err);
    match target {
        Surface::WeatherNote => state.weather_note = text,
        Surface::DeviceNote => state.device_note = text,
        Surface::Notice => state.notice = text,
        Surface::Silent => {}
    }
}
