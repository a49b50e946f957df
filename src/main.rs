//! deskwidget - Desktop sidebar widget
//!
//! Clock, audio volume panel, weather and a tray icon.
//!
//! Run with `--debug` to show a console window with log output.

// Hide console window in release mode unless --debug is passed
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use deskwidget::config::Args;

#[cfg(windows)]
fn main() -> Result<()> {
    use deskwidget::autostart::{Autostart, RegistryRunKey, APP_NAME};
    use deskwidget::device::{CoreAudioBackend, DeviceDirectory};
    use deskwidget::settings::SettingsStore;
    use deskwidget::weather::{HttpTransport, WeatherClient, WeatherWorker};
    use deskwidget::widget::{Controller, Runtime};
    use tracing::info;

    let args = Args::parse();

    // In debug mode, allocate a console window for stdout/stderr
    if args.debug {
        unsafe {
            windows::Win32::System::Console::AllocConsole()?;
        }
    }
    init_logging(&args)?;

    info!("Starting deskwidget {}", deskwidget::VERSION);

    let settings = match &args.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::at_default_path(),
    };
    info!("Settings file: {}", settings.path().display());

    let weather_config = args.weather_config();
    let transport = HttpTransport::new(weather_config.timeout)?;
    let weather = WeatherWorker::new(WeatherClient::new(transport, weather_config));

    // COM is initialized apartment-threaded on this (the UI) thread
    let directory = DeviceDirectory::new(CoreAudioBackend::new()?);

    let autostart = Autostart::new(RegistryRunKey, APP_NAME, &std::env::current_exe()?);

    let controller = Controller::new(Runtime::new(settings, directory, weather, autostart));
    deskwidget::tray::run(controller)
}

#[cfg(not(windows))]
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    anyhow::bail!("deskwidget needs the Windows audio and registry APIs")
}

fn init_logging(args: &Args) -> Result<()> {
    if !args.wants_logging() {
        return Ok(());
    }

    let level = args.log_level();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(log_file) = &args.log {
        let file = std::fs::File::create(log_file)?;
        subscriber.with_ansi(false).with_writer(file).init();
    } else {
        subscriber.init();
    }

    Ok(())
}
