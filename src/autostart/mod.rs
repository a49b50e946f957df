//! Per-user "run at login" toggle

#[cfg(windows)]
mod registry;

#[cfg(windows)]
pub use registry::RegistryRunKey;

use crate::error::Result;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Registry value name
pub const APP_NAME: &str = "deskwidget";

/// Per-user run key location
pub const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Named string values under the run-at-login key
pub trait RunKeyStore {
    fn get(&self, name: &str) -> Result<Option<String>>;
    fn set(&self, name: &str, value: &str) -> Result<()>;
    fn delete(&self, name: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutostartState {
    Enabled,
    Disabled,
}

impl fmt::Display for AutostartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutostartState::Enabled => write!(f, "enabled"),
            AutostartState::Disabled => write!(f, "disabled"),
        }
    }
}

/// Autostart registration for one executable
pub struct Autostart<S> {
    store: S,
    name: String,
    command: String,
}

impl<S: RunKeyStore> Autostart<S> {
    /// Registration that launches `exe` (quoted) under `name`
    pub fn new(store: S, name: impl Into<String>, exe: &Path) -> Self {
        Self {
            store,
            name: name.into(),
            command: format!("\"{}\"", exe.display()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registry value written when enabling
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.store.get(&self.name)?.is_some())
    }

    /// Create the value if absent, delete it if present
    ///
    /// An existing value is not checked against the current executable path.
    pub fn toggle(&self) -> Result<AutostartState> {
        let state = if self.is_enabled()? {
            self.store.delete(&self.name)?;
            AutostartState::Disabled
        } else {
            self.store.set(&self.name, &self.command)?;
            AutostartState::Enabled
        };

        info!("Autostart {}", state);
        Ok(state)
    }
}
