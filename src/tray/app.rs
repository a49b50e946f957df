//! Widget window and tray icon

use crate::autostart::RunKeyStore;
use crate::clock::{ClockTicker, TICK_INTERVAL};
use crate::device::AudioBackend;
use crate::tray::icon::load_tray_icon;
use crate::tray::menu::MenuManager;
use crate::tray::view;
use crate::weather::WeatherTransport;
use crate::widget::{Controller, Event, TrayAction, WindowCommand};
use anyhow::Result;
use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use muda::MenuEvent;
use std::path::Path;
use tracing::{error, info, warn};
use tray_icon::{TrayIcon, TrayIconBuilder, TrayIconEvent};

/// Korean-capable system font, used for localized weather descriptions
const FALLBACK_FONT: &str = r"C:\Windows\Fonts\malgun.ttf";

/// Main widget application
pub struct WidgetApp<B, T, R> {
    controller: Controller<B, T, R>,
    ticker: ClockTicker,
    tray_icon: Option<TrayIcon>,
    tray_rx: Receiver<TrayAction>,
}

impl<B, T, R> WidgetApp<B, T, R>
where
    B: AudioBackend + 'static,
    T: WeatherTransport + Send + Sync + 'static,
    R: RunKeyStore + 'static,
{
    /// Create the tray icon and run the startup sequence
    ///
    /// Settings were loaded when `controller` was built; the tray comes next,
    /// then the clock, devices and saved city.
    pub fn new(cc: &eframe::CreationContext<'_>, controller: Controller<B, T, R>) -> Self {
        install_fonts(&cc.egui_ctx);

        let (tray_tx, tray_rx) = unbounded();
        let tray_icon = match create_tray(&cc.egui_ctx, tray_tx) {
            Ok(icon) => Some(icon),
            Err(e) => {
                error!("Failed to create tray icon: {:#}", e);
                None
            }
        };

        let ctx = cc.egui_ctx.clone();
        controller
            .runtime()
            .weather()
            .set_waker(move || ctx.request_repaint());

        let mut app = Self {
            controller,
            ticker: ClockTicker::new(),
            tray_icon,
            tray_rx,
        };

        let now = Local::now();
        app.ticker.poll(now);
        let commands = app.controller.start(now);
        app.apply(&cc.egui_ctx, commands);
        app
    }

    fn apply(&mut self, ctx: &egui::Context, commands: Vec<WindowCommand>) {
        for command in commands {
            match command {
                WindowCommand::Restore => {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
                }
                WindowCommand::Quit => {
                    info!("Exit application");
                    if let Some(tray) = self.tray_icon.take() {
                        if let Err(e) = tray.set_visible(false) {
                            warn!("Failed to hide tray icon: {}", e);
                        }
                    }
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }
    }
}

impl<B, T, R> eframe::App for WidgetApp<B, T, R>
where
    B: AudioBackend + 'static,
    T: WeatherTransport + Send + Sync + 'static,
    R: RunKeyStore + 'static,
{
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut commands = Vec::new();

        if let Some(now) = self.ticker.poll(Local::now()) {
            commands.extend(self.controller.dispatch(Event::Tick(now)));
        }

        while let Ok(action) = self.tray_rx.try_recv() {
            commands.extend(self.controller.dispatch(Event::Tray(action)));
        }

        commands.extend(self.controller.poll());

        for event in view::show(ctx, self.controller.state()) {
            commands.extend(self.controller.dispatch(event));
        }

        self.apply(ctx, commands);

        // Wake up a few times per tick so the second never lags visibly
        ctx.request_repaint_after(TICK_INTERVAL / 4);
    }
}

/// Build the tray icon and route its events into `tray_tx`
fn create_tray(ctx: &egui::Context, tray_tx: Sender<TrayAction>) -> Result<TrayIcon> {
    let mut menu_manager = MenuManager::new();
    let menu = menu_manager.build_menu()?;

    let tray_icon = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip("deskwidget")
        .with_icon(load_tray_icon()?)
        .build()?;

    let actions = menu_manager.actions().clone();
    let menu_tx = tray_tx.clone();
    let menu_ctx = ctx.clone();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        if let Some(action) = actions.get(event.id()) {
            let _ = menu_tx.send(*action);
            menu_ctx.request_repaint();
        }
    }));

    let icon_ctx = ctx.clone();
    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        if let TrayIconEvent::DoubleClick { .. } = event {
            let _ = tray_tx.send(TrayAction::Restore);
            icon_ctx.request_repaint();
        }
    }));

    info!("Tray icon created");
    Ok(tray_icon)
}

fn install_fonts(ctx: &egui::Context) {
    let path = Path::new(FALLBACK_FONT);
    let Ok(bytes) = std::fs::read(path) else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("fallback".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("fallback".to_owned());
    }
    ctx.set_fonts(fonts);
}

/// Open the widget window and run until Quit
pub fn run<B, T, R>(controller: Controller<B, T, R>) -> Result<()>
where
    B: AudioBackend + 'static,
    T: WeatherTransport + Send + Sync + 'static,
    R: RunKeyStore + 'static,
{
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("deskwidget")
            .with_inner_size([300.0, 420.0])
            .with_resizable(false)
            .with_decorations(false),
        ..Default::default()
    };

    eframe::run_native(
        "deskwidget",
        options,
        Box::new(move |cc| Ok(Box::new(WidgetApp::new(cc, controller)))),
    )
    .map_err(|e| anyhow::anyhow!("Widget window failed: {}", e))
}
