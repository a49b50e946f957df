//! Everything the widget window renders

use crate::device::{DeviceDescriptor, Direction};
use crate::settings::Settings;
use crate::weather::WeatherReport;

/// Weather fields as displayed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherDisplay {
    pub location: String,
    pub condition_main: String,
    pub condition_description: String,
    pub temperature: String,
}

impl From<&WeatherReport> for WeatherDisplay {
    fn from(report: &WeatherReport) -> Self {
        Self {
            location: report.location.clone(),
            condition_main: report.condition_main.clone(),
            condition_description: report.condition_description.clone(),
            temperature: report.temperature_text(),
        }
    }
}

/// Display state of the widget plus the settings it owns
#[derive(Debug, Clone, Default)]
pub struct WidgetState {
    pub settings: Settings,
    pub clock_text: String,

    pub output_devices: Vec<DeviceDescriptor>,
    pub input_devices: Vec<DeviceDescriptor>,
    pub selected_output: Option<String>,
    pub selected_input: Option<String>,
    pub volume_percent: f32,
    pub volume_label: String,
    pub device_note: String,

    pub city_input: String,
    pub weather: WeatherDisplay,
    pub weather_note: String,
    /// Generation of the most recent weather request
    pub weather_generation: u64,
    /// Generation whose result is still awaited
    pub pending_weather: Option<u64>,

    pub notice: String,
    pub quitting: bool,
}

impl WidgetState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn devices(&self, direction: Direction) -> &[DeviceDescriptor] {
        match direction {
            Direction::Render => &self.output_devices,
            Direction::Capture => &self.input_devices,
        }
    }

    pub fn selected(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Render => self.selected_output.as_deref(),
            Direction::Capture => self.selected_input.as_deref(),
        }
    }

    /// Display name of the current selection
    pub fn selected_name(&self, direction: Direction) -> Option<&str> {
        let id = self.selected(direction)?;
        self.devices(direction)
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.name.as_str())
    }

    pub(crate) fn devices_mut(&mut self, direction: Direction) -> &mut Vec<DeviceDescriptor> {
        match direction {
            Direction::Render => &mut self.output_devices,
            Direction::Capture => &mut self.input_devices,
        }
    }

    pub(crate) fn selected_mut(&mut self, direction: Direction) -> &mut Option<String> {
        match direction {
            Direction::Render => &mut self.selected_output,
            Direction::Capture => &mut self.selected_input,
        }
    }
}
