//! CLI argument parsing using clap

use crate::weather::{WeatherConfig, DEFAULT_COUNTRY, DEFAULT_LANG};
use clap::Parser;
use std::path::PathBuf;

/// deskwidget - Desktop sidebar widget
///
/// Clock, audio volume panel, weather and a tray icon
#[derive(Parser, Debug)]
#[command(name = "deskwidget")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Show a console window and write logs to it
    #[arg(short, long)]
    pub debug: bool,

    /// Verbose output (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode - only show errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log output to file
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Settings file (default: widget_settings.json next to the executable)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Country code appended to the city in weather queries
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Language of weather descriptions
    #[arg(long, default_value = DEFAULT_LANG)]
    pub lang: String,
}

impl Args {
    /// Get the log level based on verbose/quiet flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else {
            match self.verbose {
                0 => tracing::Level::INFO,
                1 => tracing::Level::DEBUG,
                _ => tracing::Level::TRACE,
            }
        }
    }

    /// Whether any log output was asked for
    pub fn wants_logging(&self) -> bool {
        self.debug || self.log.is_some()
    }

    pub fn weather_config(&self) -> WeatherConfig {
        WeatherConfig {
            country: self.country.clone(),
            lang: self.lang.clone(),
            ..WeatherConfig::default()
        }
    }
}
