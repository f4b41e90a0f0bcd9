//! # Logger GUI Application Module
//!
//! The main window. Immediate-mode: the whole UI is rebuilt every frame from
//! the state held in [`LoggerApp`], and the session controller is polled at
//! the start of each frame so new samples reach the displays and the CSV log.
//!
//! ## Layout
//!
//! - **Menu bar**: File (Save config, Exit) and Help (About)
//! - **Log file**: "Select File" button and the chosen path
//! - **Connection**: port selector with refresh, poll delay in seconds
//! - **Controls**: Run / Pause / Stop
//! - **Displays**: temperature, humidity and pressure with two decimals
//! - **Status line**: session state, rows written, last error

use eframe::egui;
use egui::{CentralPanel, TopBottomPanel, Button, ComboBox, Color32, RichText, Stroke, TextEdit};
use crate::config::{DelaySetting, LoggerConfig, PollDelay};
use crate::constants::{APP_NAME, UI_REFRESH_INTERVAL_MS};
use crate::logger::log;
use crate::session::{RunSettings, SessionController, SessionState};
use crate::sensor::ports::{list_ports, PortInfo};
use std::time::{Duration, Instant};

/// Display frame colours
const DISPLAY_BORDER: Color32 = Color32::from_rgb(0, 140, 255);
const DISPLAY_FILL: Color32 = Color32::from_rgba_premultiplied(8, 20, 20, 20);

/// Seconds between automatic port rescans while idle
const PORT_REFRESH_SECS: u64 = 5;

pub struct LoggerApp {
    /// Settings as loaded from / last saved to `config.json`
    config: LoggerConfig,

    /// Log file chosen through the file dialog
    log_path: String,

    /// Ports found in the last scan
    ports: Vec<PortInfo>,

    /// Selected port name; may come from the config without being present
    selected_port: String,

    /// Poll delay exactly as typed
    delay_text: String,

    session: SessionController,

    last_port_refresh: Instant,

    /// Transient message such as "Configuration saved"
    notice: Option<String>,

    show_about: bool,
}

impl LoggerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self::with_config(LoggerConfig::load())
    }

    fn with_config(config: LoggerConfig) -> Self {
        let ports = list_ports();
        log::info!("Found {} serial ports at startup", ports.len());

        LoggerApp {
            log_path: config.log_path.clone(),
            selected_port: config.port.clone(),
            delay_text: config.delay.as_text(),
            config,
            ports,
            session: SessionController::new(),
            last_port_refresh: Instant::now(),
            notice: None,
            show_about: false,
        }
    }

    /// File → Save config. Writes the current UI values to `config.json`.
    fn save_config(&mut self) {
        self.config.log_path = self.log_path.clone();
        self.config.port = self.selected_port.clone();
        // Keep a numeric delay numeric unless the user edited it
        if self.delay_text != self.config.delay.as_text() {
            self.config.delay = DelaySetting::from(self.delay_text.as_str());
        }

        match self.config.save() {
            Ok(()) => self.notice = Some("Configuration saved".to_string()),
            Err(e) => {
                log::error!("Failed to save configuration: {}", e);
                self.notice = Some(format!("Could not save configuration: {}", e));
            }
        }
    }

    fn refresh_ports(&mut self) {
        self.ports = list_ports();
        self.last_port_refresh = Instant::now();
    }

    fn choose_log_file(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save as")
            .add_filter("TXT Files", &["txt"])
            .add_filter("CSV Files", &["csv"]);
        if let Some(home) = dirs::home_dir() {
            dialog = dialog.set_directory(home);
        }

        if let Some(path) = dialog.save_file() {
            self.log_path = path.display().to_string();
            log::info!("Log file set to {}", self.log_path);
        }
    }

    fn run(&mut self) {
        self.notice = None;
        let settings = match RunSettings::from_inputs(&self.selected_port, &self.delay_text, &self.log_path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Cannot start logging: {}", e);
                self.notice = Some(e.to_string());
                return;
            }
        };
        // Failure is recorded in the controller and shown in the status line
        let _ = self.session.start(&settings);
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("💾 Save config").clicked() {
                        self.save_config();
                        ui.close();
                    }
                    if ui.add(Button::new("Exit").shortcut_text("Ctrl+Q")).clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("ℹ About").clicked() {
                        self.show_about = true;
                        ui.close();
                    }
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.session.state();
                let colour = match state {
                    SessionState::Running if self.session.reader_alive() => Color32::GREEN,
                    SessionState::Running => Color32::RED,
                    SessionState::Paused => Color32::YELLOW,
                    SessionState::Idle => Color32::GRAY,
                };
                ui.colored_label(colour, "●");
                ui.label(state.to_string());

                if state != SessionState::Idle {
                    ui.separator();
                    ui.small(format!("{} rows", self.session.rows_written()));
                }

                if let Some(error) = self.session.last_error() {
                    ui.separator();
                    ui.colored_label(Color32::LIGHT_RED, error);
                } else if let Some(notice) = &self.notice {
                    ui.separator();
                    ui.small(notice);
                }
            });
        });
    }

    fn show_about_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("About")
            .open(&mut self.show_about)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.heading(APP_NAME);
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(5.0);
                ui.label(
                    "Data logger for the BME280 sensor. Writes logs with the columns \
                     {Time, Temperature, Humidity, Pressure}.",
                );
            });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let editable = self.session.state() != SessionState::Running;

        ui.group(|ui| {
            ui.vertical_centered_justified(|ui| {
                if ui.add_enabled(editable, Button::new("📁 Select File")).clicked() {
                    self.choose_log_file();
                }
                let mut shown_path = self.log_path.clone();
                ui.add(
                    TextEdit::singleline(&mut shown_path)
                        .interactive(false)
                        .horizontal_align(egui::Align::Center)
                        .hint_text("no log file selected"),
                )
                .on_hover_text("Current path");
            });
        });

        ui.add_space(6.0);

        ui.group(|ui| {
            egui::Grid::new("connection_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Port");
                    ui.horizontal(|ui| {
                        ui.add_enabled_ui(editable, |ui| {
                            let selected_text = if self.selected_port.is_empty() {
                                "Select port".to_string()
                            } else {
                                self.selected_port.clone()
                            };
                            ComboBox::from_id_salt("port_selector")
                                .selected_text(selected_text)
                                .width(180.0)
                                .show_ui(ui, |ui| {
                                    for port in &self.ports {
                                        ui.selectable_value(&mut self.selected_port, port.name.clone(), port.label.as_str());
                                    }
                                });
                            if ui.small_button("🔄").on_hover_text("Rescan serial ports").clicked() {
                                self.refresh_ports();
                            }
                        });
                    });
                    ui.end_row();

                    ui.label("Delay [s]");
                    let valid = PollDelay::parse(&self.delay_text).is_ok();
                    let mut edit = TextEdit::singleline(&mut self.delay_text)
                        .desired_width(80.0)
                        .horizontal_align(egui::Align::Center);
                    if !valid {
                        edit = edit.text_color(Color32::LIGHT_RED);
                    }
                    ui.add_enabled(editable, edit)
                        .on_hover_text("Seconds between samples, e.g. 1 or 0.5");
                    ui.end_row();
                });
        });

        ui.add_space(6.0);

        let state = self.session.state();
        ui.columns(3, |cols| {
            cols[0].vertical_centered_justified(|ui| {
                if ui.add_enabled(state != SessionState::Running, Button::new("▶ Run")).clicked() {
                    self.run();
                }
            });
            cols[1].vertical_centered_justified(|ui| {
                if ui.add_enabled(state == SessionState::Running, Button::new("⏸ Pause")).clicked() {
                    self.session.pause();
                }
            });
            cols[2].vertical_centered_justified(|ui| {
                if ui.add_enabled(state != SessionState::Idle, Button::new("⏹ Stop")).clicked() {
                    self.session.stop();
                }
            });
        });
    }

    fn show_displays(&self, ui: &mut egui::Ui) {
        let reading = self.session.last_sample().map(|s| s.reading);
        let values = [
            (reading.map(|r| r.temperature), "C"),
            (reading.map(|r| r.humidity), "%"),
            (reading.map(|r| r.pressure), "Pa"),
        ];

        for (value, unit) in values {
            ui.horizontal(|ui| {
                let text = value.map_or_else(|| "--".to_string(), |v| format!("{:.2}", v));
                egui::Frame::new()
                    .fill(DISPLAY_FILL)
                    .stroke(Stroke::new(3.0, DISPLAY_BORDER))
                    .corner_radius(8.0)
                    .inner_margin(7.0)
                    .outer_margin(1.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width() - 40.0);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(RichText::new(text).monospace().size(40.0).color(Color32::WHITE));
                        });
                    });
                ui.label(RichText::new(unit).size(18.0));
            });
            ui.add_space(4.0);
        }
    }
}

impl eframe::App for LoggerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();

        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        if self.session.state() == SessionState::Idle
            && self.last_port_refresh.elapsed().as_secs() > PORT_REFRESH_SECS
        {
            self.refresh_ports();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_controls(ui);
            ui.add_space(10.0);
            self.show_displays(ui);
        });

        if self.show_about {
            self.show_about_window(ctx);
        }

        // Keep draining the mailbox even without user input
        if self.session.state() == SessionState::Running {
            ctx.request_repaint_after(Duration::from_millis(UI_REFRESH_INTERVAL_MS));
        }
    }
}
