//! Pure state transitions

use super::event::{Effect, Event, TrayAction, WindowCommand};
use super::policy::{self, Operation, NOTE_CITY_SAVED, NOTE_LOADING};
use super::state::{WeatherDisplay, WidgetState};
use crate::autostart::AutostartState;
use crate::clock::format_clock;
use crate::device::{format_volume_label, Direction, VolumeTarget};
use crate::error::WidgetError;
use crate::weather::WeatherRequest;
use tracing::debug;

/// Apply one event, returning the new state and the side effects to run
pub fn update(mut state: WidgetState, event: Event) -> (WidgetState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        Event::Started => {
            effects.push(Effect::LoadDevices(Direction::Render));
            effects.push(Effect::LoadDevices(Direction::Capture));

            if !state.settings.city.is_empty() {
                state.city_input = state.settings.city.clone();
                let city = state.settings.city.clone();
                request_weather(&mut state, &mut effects, city);
            }
        }

        Event::Tick(now) => state.clock_text = format_clock(&now),

        Event::DevicesLoaded {
            direction,
            result,
            default_id,
        } => {
            let devices = result.unwrap_or_else(|e| {
                policy::report(&mut state, Operation::EnumerateDevices, &e);
                Vec::new()
            });

            let selected = default_id.filter(|id| devices.iter().any(|d| &d.id == id));
            *state.devices_mut(direction) = devices;
            *state.selected_mut(direction) = selected.clone();

            match (direction, selected) {
                (Direction::Render, Some(id)) => effects.push(Effect::ReadVolume { id }),
                (_, None) => debug!("Default {} device not in active list", direction),
                _ => {}
            }
        }

        Event::DeviceSelected { direction, id } => {
            state.device_note.clear();
            *state.selected_mut(direction) = Some(id.clone());
            match direction {
                Direction::Render => effects.push(Effect::ReadVolume { id }),
                Direction::Capture => effects.push(Effect::ResolveDevice { direction, id }),
            }
        }

        Event::DeviceResolved {
            direction,
            id,
            result,
        } => {
            if let Err(e) = result {
                forget_device(&mut state, direction, &id, &e);
                policy::report(&mut state, Operation::ResolveDevice, &e);
            }
        }

        Event::VolumeRead { id, result } => match result {
            Ok(percent) if state.selected_output.as_deref() == Some(id.as_str()) => {
                state.volume_percent = percent;
                state.volume_label = format_volume_label(percent);
            }
            Ok(_) => debug!("Ignoring volume of unselected device {}", id),
            Err(e) => {
                forget_device(&mut state, Direction::Render, &id, &e);
                policy::report(&mut state, Operation::ReadVolume, &e);
            }
        },

        Event::VolumeChanged(percent) => {
            let percent = percent.clamp(0.0, 100.0);
            // The label follows the slider whether or not the write lands
            state.volume_percent = percent;
            state.volume_label = format_volume_label(percent);
            effects.push(Effect::WriteVolume {
                device: state.selected_output.clone(),
                percent,
            });
        }

        Event::VolumeWritten(result) => match result {
            Ok(VolumeTarget::SystemDefault(id)) => {
                debug!("No output selected, wrote system default {}", id)
            }
            Ok(VolumeTarget::Selected(_)) => {}
            Err(e) => {
                if let Some(id) = state.selected_output.clone() {
                    forget_device(&mut state, Direction::Render, &id, &e);
                }
                policy::report(&mut state, Operation::WriteVolume, &e);
            }
        },

        Event::CityEdited(text) => state.city_input = text,

        Event::RefreshWeather => {
            let city = state.city_input.trim().to_string();
            if !city.is_empty() {
                request_weather(&mut state, &mut effects, city);
            }
        }

        Event::SaveCity => {
            let city = state.city_input.trim().to_string();
            if !city.is_empty() {
                state.settings.city = city;
                effects.push(Effect::SaveSettings(state.settings.clone()));
                state.weather_note = NOTE_CITY_SAVED.to_string();
            }
        }

        Event::SettingsSaved(result) => {
            if let Err(e) = result {
                policy::report(&mut state, Operation::SaveSettings, &e);
            }
        }

        Event::WeatherFetched(outcome) => {
            if state.pending_weather != Some(outcome.generation) {
                debug!(
                    "Discarding weather result {} (waiting for {:?})",
                    outcome.generation, state.pending_weather
                );
            } else {
                state.pending_weather = None;
                match outcome.result {
                    Ok(report) => {
                        state.weather = WeatherDisplay::from(&report);
                        state.weather_note =
                            format!("Updated at {}", report.fetched_at.format("%H:%M:%S"));
                    }
                    // Previous fields stay as they were; only the note changes
                    Err(e) => policy::report(&mut state, Operation::FetchWeather, &e),
                }
            }
        }

        Event::Tray(action) => match action {
            TrayAction::Restore => effects.push(Effect::Window(WindowCommand::Restore)),
            TrayAction::ToggleAutostart => effects.push(Effect::ToggleAutostart),
            TrayAction::Quit => {
                state.quitting = true;
                effects.push(Effect::Window(WindowCommand::Quit));
            }
        },

        Event::AutostartToggled(result) => match result {
            Ok(AutostartState::Enabled) => state.notice = "Autostart enabled".to_string(),
            Ok(AutostartState::Disabled) => state.notice = "Autostart disabled".to_string(),
            Err(e) => policy::report(&mut state, Operation::ToggleAutostart, &e),
        },
    }

    (state, effects)
}

fn request_weather(state: &mut WidgetState, effects: &mut Vec<Effect>, city: String) {
    if state.settings.api_key.trim().is_empty() {
        policy::report(state, Operation::FetchWeather, &WidgetError::MissingApiKey);
        return;
    }

    state.weather_generation += 1;
    state.pending_weather = Some(state.weather_generation);
    state.weather_note = NOTE_LOADING.to_string();
    effects.push(Effect::FetchWeather(WeatherRequest {
        generation: state.weather_generation,
        city,
        api_key: state.settings.api_key.clone(),
    }));
}

/// Drop a selection whose device the OS no longer knows
fn forget_device(state: &mut WidgetState, direction: Direction, id: &str, err: &WidgetError) {
    if matches!(err, WidgetError::DeviceNotFound(_)) && state.selected(direction) == Some(id) {
        *state.selected_mut(direction) = None;
    }
}
