//! Widget settings persistence using JSON format

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Settings file name
pub const SETTINGS_FILE: &str = "widget_settings.json";

/// Persisted widget settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// City used for the weather lookup
    #[serde(rename = "WeatherCity")]
    pub city: String,
    /// OpenWeatherMap API key
    #[serde(rename = "OpenWeatherApiKey")]
    pub api_key: String,
}

/// Reads and writes [`Settings`] at a fixed path
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields defaults, unreadable or malformed content is an error
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!("Settings file not found, using defaults");
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let settings = serde_json::from_str(&content)?;
        info!("Loaded settings from {:?}", self.path);
        Ok(settings)
    }

    /// Load settings, substituting defaults on any failure
    pub fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_else(|e| {
            warn!("Failed to load settings: {}", e);
            Settings::default()
        })
    }

    /// Save settings as indented JSON, overwriting the file
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        info!("Saved settings to {:?}", self.path);
        Ok(())
    }

    /// Get settings file path (MSIX-compatible)
    ///
    /// When running as MSIX package, settings are stored in LocalAppData.
    /// For standalone executable, settings are stored alongside the executable.
    pub fn default_path() -> PathBuf {
        if std::env::var("MSIX_PACKAGE_FAMILY_NAME").is_ok() {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("deskwidget")
                .join(SETTINGS_FILE)
        } else {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."))
                .join(SETTINGS_FILE)
        }
    }
}
