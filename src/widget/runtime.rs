//! Executes effects against the OS, the network and the settings file

use super::event::{Effect, Event};
use crate::autostart::{Autostart, RunKeyStore};
use crate::device::{AudioBackend, DeviceDirectory, Direction, VolumeController};
use crate::settings::SettingsStore;
use crate::weather::{WeatherTransport, WeatherWorker};
use tracing::debug;

/// Owns every component with side effects
pub struct Runtime<B, T, R> {
    settings: SettingsStore,
    directory: DeviceDirectory<B>,
    weather: WeatherWorker<T>,
    autostart: Autostart<R>,
}

impl<B, T, R> Runtime<B, T, R>
where
    B: AudioBackend,
    T: WeatherTransport + Send + Sync + 'static,
    R: RunKeyStore,
{
    pub fn new(
        settings: SettingsStore,
        directory: DeviceDirectory<B>,
        weather: WeatherWorker<T>,
        autostart: Autostart<R>,
    ) -> Self {
        Self {
            settings,
            directory,
            weather,
            autostart,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn directory(&self) -> &DeviceDirectory<B> {
        &self.directory
    }

    pub fn weather(&self) -> &WeatherWorker<T> {
        &self.weather
    }

    pub fn autostart(&self) -> &Autostart<R> {
        &self.autostart
    }

    /// Run one effect; synchronous effects report back with an event
    ///
    /// Weather fetches complete later through [`WeatherWorker`]; window
    /// commands are left to the window layer.
    pub fn execute(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::LoadDevices(direction) => {
                let result = self.directory.enumerate(direction);
                let default_id = match self.directory.default_device(direction) {
                    Ok(device) => Some(device.id),
                    Err(e) => {
                        debug!("No default {} device: {}", direction, e);
                        None
                    }
                };
                Some(Event::DevicesLoaded {
                    direction,
                    result,
                    default_id,
                })
            }

            Effect::ResolveDevice { direction, id } => {
                let result = self.directory.resolve(direction, &id).map(|_| ());
                Some(Event::DeviceResolved {
                    direction,
                    id,
                    result,
                })
            }

            Effect::ReadVolume { id } => {
                let result = self
                    .directory
                    .resolve(Direction::Render, &id)
                    .and_then(|handle| VolumeController::new(&self.directory).get_percent(&handle));
                Some(Event::VolumeRead { id, result })
            }

            Effect::WriteVolume { device, percent } => {
                let volume = VolumeController::new(&self.directory);
                let result = match device {
                    Some(id) => self
                        .directory
                        .resolve(Direction::Render, &id)
                        .and_then(|handle| volume.set_percent(Some(&handle), percent)),
                    None => volume.set_percent(None, percent),
                };
                Some(Event::VolumeWritten(result))
            }

            Effect::SaveSettings(settings) => Some(Event::SettingsSaved(self.settings.save(&settings))),

            Effect::FetchWeather(request) => {
                self.weather.spawn(request);
                None
            }

            Effect::ToggleAutostart => Some(Event::AutostartToggled(self.autostart.toggle())),

            Effect::Window(_) => None,
        }
    }
}
