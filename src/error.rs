//! Unified error types for deskwidget

use crate::device::Direction;
use thiserror::Error;

/// Main error type for deskwidget operations
#[derive(Error, Debug)]
pub enum WidgetError {
    /// COM initialization or call failed
    #[cfg(windows)]
    #[error("COM error: {0}")]
    Com(#[from] windows::core::Error),

    /// Settings file could not be read or written
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings file exists but is not valid JSON for the expected shape
    #[error("Settings file is malformed: {0}")]
    SettingsFormat(#[from] serde_json::Error),

    /// Device not found (removed, disabled or unplugged since enumeration)
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Device operation error
    #[error("Device '{device_id}' error: {message}")]
    DeviceError { device_id: String, message: String },

    /// The OS reports no default endpoint for a direction
    #[error("No default {0} device")]
    NoDefaultDevice(Direction),

    /// Weather lookup attempted without an API key
    #[error("OpenWeather API key is not configured")]
    MissingApiKey,

    /// Weather request timed out
    #[error("Weather request timed out")]
    Timeout,

    /// Transport-level HTTP failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("Weather service returned {status}: {message}")]
    WeatherApi { status: u16, message: String },

    /// Response body is not the expected JSON
    #[error("Invalid weather response: {0}")]
    WeatherFormat(String),

    /// Registry access failed
    #[error("Registry error: {0}")]
    Registry(String),
}

/// Result type alias for deskwidget operations
pub type Result<T> = std::result::Result<T, WidgetError>;

impl WidgetError {
    /// Create a device error with context
    pub fn device_error(device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DeviceError {
            device_id: device_id.into(),
            message: message.into(),
        }
    }

    /// Errors raised by the weather fetch boundary
    pub fn is_weather(&self) -> bool {
        matches!(
            self,
            WidgetError::MissingApiKey
                | WidgetError::Timeout
                | WidgetError::Network(_)
                | WidgetError::WeatherApi { .. }
                | WidgetError::WeatherFormat(_)
        )
    }
}

impl From<reqwest::Error> for WidgetError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WidgetError::Timeout
        } else {
            // Strip the URL: it carries the API key as a query parameter
            WidgetError::Network(e.without_url().to_string())
        }
    }
}
