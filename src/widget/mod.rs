//! Widget core: display state, events, effects and the controller
//!
//! `update` is a pure transition from one [`WidgetState`] to the next; all OS
//! and network work happens in [`Runtime`], and [`Controller`] feeds the
//! events it produces back through `update` one at a time.

mod controller;
mod event;
pub mod policy;
mod runtime;
mod state;
mod update;

pub use controller::Controller;
pub use event::{Effect, Event, TrayAction, WindowCommand};
pub use runtime::Runtime;
pub use state::{WeatherDisplay, WidgetState};
pub use update::update;
