//! Command-line configuration

mod args;

pub use args::Args;
