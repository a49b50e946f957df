//! Widget window and system tray
//!
//! An egui window driven by the widget controller, plus a tray icon whose
//! menu feeds the same event queue.

mod app;
mod icon;
mod menu;
mod view;

pub use app::{run, WidgetApp};
