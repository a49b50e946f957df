//! Inputs to and outputs of the widget state machine

use crate::autostart::AutostartState;
use crate::device::{DeviceDescriptor, Direction, VolumeTarget};
use crate::error::Result;
use crate::settings::Settings;
use crate::weather::{WeatherOutcome, WeatherRequest};
use chrono::{DateTime, Local};

/// Tray menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Restore,
    ToggleAutostart,
    Quit,
}

/// Discrete events, handled one at a time on the UI thread
#[derive(Debug)]
pub enum Event {
    /// Settings are loaded and the tray exists; load devices and the saved city
    Started,
    /// Clock tick
    Tick(DateTime<Local>),
    DevicesLoaded {
        direction: Direction,
        result: Result<Vec<DeviceDescriptor>>,
        default_id: Option<String>,
    },
    /// User picked a combo-box entry
    DeviceSelected { direction: Direction, id: String },
    DeviceResolved {
        direction: Direction,
        id: String,
        result: Result<()>,
    },
    VolumeRead { id: String, result: Result<f32> },
    /// User dragged the slider
    VolumeChanged(f32),
    VolumeWritten(Result<VolumeTarget>),
    CityEdited(String),
    RefreshWeather,
    SaveCity,
    SettingsSaved(Result<()>),
    WeatherFetched(WeatherOutcome),
    Tray(TrayAction),
    AutostartToggled(Result<AutostartState>),
}

/// Commands only the window layer can carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    /// Unminimize, show and focus
    Restore,
    /// Hide the tray icon and exit
    Quit,
}

/// Side effects requested by [`update`](super::update)
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadDevices(Direction),
    ResolveDevice { direction: Direction, id: String },
    ReadVolume { id: String },
    /// `device: None` writes the system default output
    WriteVolume { device: Option<String>, percent: f32 },
    SaveSettings(Settings),
    FetchWeather(WeatherRequest),
    ToggleAutostart,
    Window(WindowCommand),
}
