//! Drives the state machine: one event at a time, effects in order

use super::event::{Effect, Event, WindowCommand};
use super::policy::{self, Operation};
use super::runtime::Runtime;
use super::state::WidgetState;
use super::update::update;
use crate::autostart::RunKeyStore;
use crate::device::AudioBackend;
use crate::weather::WeatherTransport;
use chrono::{DateTime, Local};
use std::collections::VecDeque;
use tracing::info;

/// Owns the widget state and the runtime that performs its effects
pub struct Controller<B, T, R> {
    state: WidgetState,
    runtime: Runtime<B, T, R>,
}

impl<B, T, R> Controller<B, T, R>
where
    B: AudioBackend,
    T: WeatherTransport + Send + Sync + 'static,
    R: RunKeyStore,
{
    /// Load settings and build the initial state
    pub fn new(runtime: Runtime<B, T, R>) -> Self {
        let mut state = WidgetState::default();
        match runtime.settings().load() {
            Ok(settings) => state.settings = settings,
            Err(e) => policy::report(&mut state, Operation::LoadSettings, &e),
        }

        Self { state, runtime }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn runtime(&self) -> &Runtime<B, T, R> {
        &self.runtime
    }

    /// Run the startup sequence: clock, then devices, then the saved city
    ///
    /// Settings are loaded by [`Controller::new`] and the tray is created by
    /// the window layer before this is called.
    pub fn start(&mut self, now: DateTime<Local>) -> Vec<WindowCommand> {
        info!("Starting widget");
        let mut commands = self.dispatch(Event::Tick(now));
        commands.extend(self.dispatch(Event::Started));
        commands
    }

    /// Handle one event and every event its effects produce
    pub fn dispatch(&mut self, event: Event) -> Vec<WindowCommand> {
        let mut queue = VecDeque::from([event]);
        let mut commands = Vec::new();

        while let Some(event) = queue.pop_front() {
            let (state, effects) = update(std::mem::take(&mut self.state), event);
            self.state = state;

            for effect in effects {
                match effect {
                    Effect::Window(command) => commands.push(command),
                    effect => queue.extend(self.runtime.execute(effect)),
                }
            }
        }

        commands
    }

    /// Apply finished background work
    pub fn poll(&mut self) -> Vec<WindowCommand> {
        let mut commands = Vec::new();
        for outcome in self.runtime.weather().try_recv_all() {
            commands.extend(self.dispatch(Event::WeatherFetched(outcome)));
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autostart::{Autostart, APP_NAME};
    use crate::device::{DeviceDirectory, Direction, EndpointState};
    use crate::settings::{Settings, SettingsStore, SETTINGS_FILE};
    use crate::testing::{FakeAudio, MemoryRunKey, MockTransport};
    use crate::weather::{WeatherClient, WeatherConfig, WeatherWorker};
    use crate::widget::event::TrayAction;
    use crate::widget::policy::{NOTE_API_KEY_MISSING, NOTE_DEVICE_GONE};
    use std::path::Path;
    use std::time::Duration;

    const SEOUL: &str = r#"{"name":"Seoul","weather":[{"main":"Clear","description":"clear sky"}],"main":{"temp":21.5}}"#;

    type TestController = Controller<FakeAudio, MockTransport, MemoryRunKey>;

    fn audio() -> FakeAudio {
        FakeAudio::new()
            .with_device(Direction::Render, "spk", "Speakers", EndpointState::Active)
            .with_device(Direction::Render, "hdmi", "Monitor", EndpointState::Unplugged)
            .with_device(Direction::Render, "usb", "USB DAC", EndpointState::Active)
            .with_device(Direction::Capture, "mic", "Microphone", EndpointState::Active)
            .with_default(Direction::Render, "usb")
            .with_default(Direction::Capture, "mic")
            .with_volume("usb", 0.35)
    }

    fn controller(
        dir: &tempfile::TempDir,
        settings: Option<Settings>,
        audio: FakeAudio,
        transport: MockTransport,
    ) -> TestController {
        let store = SettingsStore::new(dir.path().join(SETTINGS_FILE));
        if let Some(settings) = settings {
            store.save(&settings).unwrap();
        }
        let runtime = Runtime::new(
            store,
            DeviceDirectory::new(audio),
            WeatherWorker::new(WeatherClient::new(transport, WeatherConfig::default())),
            Autostart::new(MemoryRunKey::default(), APP_NAME, Path::new(r"C:\w\deskwidget.exe")),
        );
        Controller::new(runtime)
    }

    fn keyed(city: &str) -> Option<Settings> {
        Some(Settings {
            city: city.into(),
            api_key: "key".into(),
        })
    }

    /// Wait for the next weather outcome and apply it
    fn settle(controller: &mut TestController) {
        let outcome = controller
            .runtime()
            .weather()
            .recv_timeout(Duration::from_secs(5))
            .expect("weather outcome");
        controller.dispatch(Event::WeatherFetched(outcome));
    }

    #[test]
    fn test_startup_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, keyed("Seoul"), audio(), MockTransport::ok(200, SEOUL));

        let commands = c.start(Local::now());
        assert!(commands.is_empty());

        let state = c.state();
        assert_eq!(state.clock_text.len(), "2024-01-01 00:00:00".len());

        let outputs: Vec<_> = state.output_devices.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(outputs, ["spk", "usb"]);
        assert_eq!(state.selected_output.as_deref(), Some("usb"));
        assert_eq!(state.selected_input.as_deref(), Some("mic"));
        assert_eq!(state.volume_label, "35%");

        assert_eq!(state.city_input, "Seoul");
        assert_eq!(state.weather_note, policy::NOTE_LOADING);

        settle(&mut c);
        let state = c.state();
        assert_eq!(state.weather.location, "Seoul");
        assert_eq!(state.weather.condition_main, "Clear");
        assert_eq!(state.weather.condition_description, "clear sky");
        assert_eq!(state.weather.temperature, "21.5 °C");
    }

    #[test]
    fn test_corrupt_settings_start_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{{{").unwrap();
        let mut c = controller(&dir, None, audio(), MockTransport::ok(200, SEOUL));

        assert_eq!(c.state().settings, Settings::default());
        c.start(Local::now());
        assert!(c.state().city_input.is_empty());
        assert!(c.state().weather_note.is_empty());
        assert_eq!(c.runtime().weather().client().transport().calls(), 0);
    }

    #[test]
    fn test_missing_api_key_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Some(Settings {
            city: "Seoul".into(),
            api_key: String::new(),
        });
        let mut c = controller(&dir, settings, audio(), MockTransport::ok(200, SEOUL));

        c.start(Local::now());
        c.dispatch(Event::RefreshWeather);

        assert_eq!(c.state().weather_note, NOTE_API_KEY_MISSING);
        std::thread::sleep(Duration::from_millis(50));
        c.poll();
        assert_eq!(c.runtime().weather().client().transport().calls(), 0);
    }

    #[test]
    fn test_timeout_keeps_previous_weather() {
        let dir = tempfile::tempdir().unwrap();
        let transport = MockTransport::responding(|query| {
            if query[0].1.starts_with("Seoul") {
                Ok(crate::weather::HttpResponse {
                    status: 200,
                    body: SEOUL.to_string(),
                })
            } else {
                Err(crate::error::WidgetError::Timeout)
            }
        });
        let mut c = controller(&dir, keyed("Seoul"), audio(), transport);
        c.start(Local::now());
        settle(&mut c);
        let before = c.state().weather.clone();

        c.dispatch(Event::CityEdited("Busan".into()));
        c.dispatch(Event::RefreshWeather);
        settle(&mut c);

        let state = c.state();
        assert_eq!(state.weather, before);
        assert!(state.weather_note.contains("timed out"), "{}", state.weather_note);
    }

    #[test]
    fn test_volume_set_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, None, audio(), MockTransport::timing_out());
        c.start(Local::now());

        c.dispatch(Event::DeviceSelected {
            direction: Direction::Render,
            id: "spk".into(),
        });
        c.dispatch(Event::VolumeChanged(42.0));
        assert_eq!(c.state().volume_label, "42%");
        assert!((c.runtime().directory().backend().scalar("spk") - 0.42).abs() < 1e-6);

        // Reselecting reads the value back from the device
        c.dispatch(Event::DeviceSelected {
            direction: Direction::Render,
            id: "usb".into(),
        });
        c.dispatch(Event::DeviceSelected {
            direction: Direction::Render,
            id: "spk".into(),
        });
        assert!((c.state().volume_percent - 42.0).abs() < 1e-3);
    }

    #[test]
    fn test_volume_without_selection_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let audio = FakeAudio::new()
            .with_device(Direction::Render, "spk", "Speakers", EndpointState::Active)
            .with_device(Direction::Render, "bt", "Headset", EndpointState::Active)
            .with_default(Direction::Render, "bt");
        let mut c = controller(&dir, None, audio, MockTransport::timing_out());
        c.start(Local::now());
        c.dispatch(Event::DeviceSelected {
            direction: Direction::Render,
            id: "spk".into(),
        });
        // Unplugged after selection: the write fails and the selection is dropped
        c.runtime().directory().backend().remove("spk");

        c.dispatch(Event::VolumeChanged(20.0));
        assert_eq!(c.state().selected_output, None);
        assert_eq!(c.state().device_note, NOTE_DEVICE_GONE);
        assert_eq!(c.state().volume_label, "20%");

        c.dispatch(Event::VolumeChanged(55.0));
        assert_eq!(c.state().volume_label, "55%");
        assert!((c.runtime().directory().backend().scalar("bt") - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_failed_volume_write_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, None, audio().failing_writes(), MockTransport::timing_out());
        c.start(Local::now());

        c.dispatch(Event::VolumeChanged(80.0));
        let state = c.state();
        assert_eq!(state.volume_label, "80%");
        assert!(state.device_note.is_empty());
        assert_eq!(state.selected_output.as_deref(), Some("usb"));
    }

    #[test]
    fn test_no_default_device_skips_volume() {
        let dir = tempfile::tempdir().unwrap();
        let audio = FakeAudio::new().with_device(
            Direction::Render,
            "spk",
            "Speakers",
            EndpointState::Active,
        );
        let mut c = controller(&dir, None, audio, MockTransport::timing_out());
        c.start(Local::now());

        assert_eq!(c.state().output_devices.len(), 1);
        assert_eq!(c.state().selected_output, None);
        assert!(c.state().volume_label.is_empty());
    }

    #[test]
    fn test_save_city_persists_only_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, keyed(""), audio(), MockTransport::ok(200, SEOUL));
        c.start(Local::now());

        c.dispatch(Event::CityEdited("Daejeon".into()));
        assert_eq!(c.runtime().settings().load().unwrap().city, "");

        c.dispatch(Event::SaveCity);
        let saved = c.runtime().settings().load().unwrap();
        assert_eq!(saved.city, "Daejeon");
        assert_eq!(saved.api_key, "key");
        assert_eq!(c.state().weather_note, policy::NOTE_CITY_SAVED);
    }

    #[test]
    fn test_tray_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir, None, audio(), MockTransport::timing_out());
        c.start(Local::now());

        assert_eq!(
            c.dispatch(Event::Tray(TrayAction::Restore)),
            vec![WindowCommand::Restore]
        );

        c.dispatch(Event::Tray(TrayAction::ToggleAutostart));
        assert_eq!(c.state().notice, "Autostart enabled");
        assert_eq!(
            c.runtime().autostart().store().value(APP_NAME).as_deref(),
            Some(r#""C:\w\deskwidget.exe""#)
        );
        c.dispatch(Event::Tray(TrayAction::ToggleAutostart));
        assert_eq!(c.state().notice, "Autostart disabled");
        assert!(!c.runtime().autostart().is_enabled().unwrap());

        assert_eq!(
            c.dispatch(Event::Tray(TrayAction::Quit)),
            vec![WindowCommand::Quit]
        );
        assert!(c.state().quitting);
    }
}
