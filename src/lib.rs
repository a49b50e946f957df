//! deskwidget - Desktop sidebar widget
//!
//! Clock, audio input/output volume panel, single-city weather lookup,
//! system tray icon and a run-at-login toggle.

pub mod autostart;
pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod settings;
#[cfg(feature = "tray")]
pub mod tray;
pub mod weather;
pub mod widget;

#[cfg(test)]
mod testing;

pub use error::{Result, WidgetError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
