//! Widget window layout

use crate::device::Direction;
use crate::widget::{Event, TrayAction, WidgetState};
use eframe::egui;

const COMBO_WIDTH: f32 = 200.0;

/// Draw the widget and collect the events the user triggered this frame
pub fn show(ctx: &egui::Context, state: &WidgetState) -> Vec<Event> {
    let mut events = Vec::new();

    egui::CentralPanel::default().show(ctx, |ui| {
        // Header doubles as the drag handle of the frameless window
        let header = ui.horizontal(|ui| {
            ui.heading(&state.clock_text);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.menu_button("Menu", |ui| {
                    for (label, action) in [
                        ("Open", TrayAction::Restore),
                        ("Toggle autostart", TrayAction::ToggleAutostart),
                        ("Quit", TrayAction::Quit),
                    ] {
                        if ui.button(label).clicked() {
                            events.push(Event::Tray(action));
                            ui.close_menu();
                        }
                    }
                });
            });
        });
        if header.response.interact(egui::Sense::drag()).drag_started() {
            ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
        }

        ui.separator();
        ui.label(egui::RichText::new("Audio").strong());
        device_combo(ui, "Output", Direction::Render, state, &mut events);
        device_combo(ui, "Input", Direction::Capture, state, &mut events);

        ui.horizontal(|ui| {
            let mut percent = state.volume_percent;
            let slider = egui::Slider::new(&mut percent, 0.0..=100.0).show_value(false);
            if ui.add(slider).changed() {
                events.push(Event::VolumeChanged(percent));
            }
            ui.label(&state.volume_label);
        });
        if !state.device_note.is_empty() {
            ui.label(egui::RichText::new(&state.device_note).weak());
        }

        ui.separator();
        ui.label(egui::RichText::new("Weather").strong());
        ui.horizontal(|ui| {
            let mut city = state.city_input.clone();
            if ui.text_edit_singleline(&mut city).changed() {
                events.push(Event::CityEdited(city));
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                events.push(Event::RefreshWeather);
            }
            if ui.button("Save city").clicked() {
                events.push(Event::SaveCity);
            }
        });

        let weather = &state.weather;
        ui.label(egui::RichText::new(&weather.location).size(16.0));
        ui.horizontal(|ui| {
            ui.label(&weather.condition_main);
            ui.label(&weather.condition_description);
        });
        ui.label(egui::RichText::new(&weather.temperature).size(22.0));
        ui.label(egui::RichText::new(&state.weather_note).weak());

        if !state.notice.is_empty() {
            ui.separator();
            ui.label(&state.notice);
        }
    });

    events
}

fn device_combo(
    ui: &mut egui::Ui,
    label: &str,
    direction: Direction,
    state: &WidgetState,
    events: &mut Vec<Event>,
) {
    let selected_id = state.selected(direction);
    egui::ComboBox::from_label(label)
        .selected_text(state.selected_name(direction).unwrap_or_default())
        .width(COMBO_WIDTH)
        .show_ui(ui, |ui| {
            for device in state.devices(direction) {
                let is_selected = selected_id == Some(device.id.as_str());
                if ui.selectable_label(is_selected, &device.name).clicked() && !is_selected {
                    events.push(Event::DeviceSelected {
                        direction,
                        id: device.id.clone(),
                    });
                }
            }
        });
}
