use std::collections::{HashSet, VecDeque};

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use env_logger::Env;

use arcade_flight::sim::{Button, Command, CommandQueue, CommandSender, Session};
use arcade_flight::telemetry::{AudioMix, Snapshot};
use arcade_flight::types::SimConfig;
use arcade_flight::vehicle::presets;

/// Seconds of history kept for the plots.
const HISTORY_SECONDS: f64 = 30.0;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let variant = std::env::args()
        .nth(1)
        .and_then(|name| presets::by_name(&name))
        .unwrap_or_else(presets::runway);
    let config = SimConfig::default();
    let (sender, queue) = CommandQueue::channel();
    let session = Session::new(variant, &config);

    let app = Cockpit {
        history: VecDeque::new(),
        last: session.snapshot(),
        session,
        queue,
        sender,
        held: HashSet::new(),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Arcade Flight", options, Box::new(|_| Ok(Box::new(app))))
}

struct Cockpit {
    session: Session,
    queue: CommandQueue,
    sender: CommandSender,
    held: HashSet<Button>,
    history: VecDeque<Snapshot>,
    last: Snapshot,
}

impl Cockpit {
    /// Turn this frame's pointer and keyboard state into press/release
    /// commands.
    fn poll_input(&mut self, ctx: &egui::Context, down_now: HashSet<Button>) {
        let mut down_now = down_now;
        ctx.input(|i| {
            let keys = [
                (egui::Key::ArrowUp, Button::Up),
                (egui::Key::ArrowDown, Button::Down),
                (egui::Key::ArrowLeft, Button::Left),
                (egui::Key::ArrowRight, Button::Right),
                (egui::Key::Q, Button::RudderLeft),
                (egui::Key::E, Button::RudderRight),
            ];
            for (key, button) in keys {
                if i.key_down(key) {
                    down_now.insert(button);
                }
            }
            if i.key_pressed(egui::Key::W) {
                self.sender.send(Button::ThrottleUp.press());
            }
            if i.key_pressed(egui::Key::S) {
                self.sender.send(Button::ThrottleDown.press());
            }
            if i.key_pressed(egui::Key::C) {
                self.sender.send(Button::Camera.press());
            }
            if i.key_pressed(egui::Key::R) {
                self.sender.send(Button::Reset.press());
            }
        });

        for b in down_now.difference(&self.held) {
            self.sender.send(b.press());
        }
        for b in self.held.difference(&down_now) {
            for cmd in b.release() {
                self.sender.send(cmd);
            }
        }
        self.held = down_now;
    }

    fn step(&mut self) {
        for cmd in self.queue.drain() {
            // Plots restart on reset
            if cmd == Command::ResetSession {
                self.history.clear();
            }
            self.session.handle(cmd);
        }
        let snap = self.session.tick();
        self.history.push_back(snap.clone());
        while self.history.front().is_some_and(|s| snap.time - s.time > HISTORY_SECONDS) {
            self.history.pop_front();
        }
        self.last = snap;
    }
}

/// A pad button that reports whether it is currently held down.
fn pad_button(ui: &mut egui::Ui, button: Button, held: &mut HashSet<Button>) {
    let response = ui.add_sized([56.0, 40.0], egui::Button::new(button.label()));
    if response.is_pointer_button_down_on() {
        held.insert(button);
    }
}

fn tap_button(ui: &mut egui::Ui, button: Button, sender: &CommandSender) {
    if ui.add_sized([56.0, 32.0], egui::Button::new(button.label())).clicked() {
        sender.send(button.press());
    }
}

impl eframe::App for Cockpit {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let hud = self.last.hud();
        let mix = AudioMix::from_feed(&self.last.audio_feed());
        let mut down_now = HashSet::new();

        egui::TopBottomPanel::top("hud").show(ctx, |ui| {
            ui.heading(format!("Variant: {}", self.session.variant().name));
            ui.horizontal(|ui| {
                ui.label(&hud.airspeed);
                ui.separator();
                ui.label(&hud.altitude);
                ui.separator();
                ui.label(&hud.heading);
                ui.separator();
                ui.label(format!("Throttle: {:.0}%", self.last.throttle * 100.0));
                ui.separator();
                ui.label(format!("Camera {}", self.last.camera.index()));
                ui.separator();
                ui.label(if self.last.grounded { "GROUNDED" } else { "AIRBORNE" });
                if !hud.warning.is_empty() {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, &hud.warning);
                }
            });
            ui.label(format!(
                "engine rate {:.2}  engine vol {:.2}  wind vol {:.2}{}",
                mix.engine_rate,
                mix.engine_volume,
                mix.wind_volume,
                if mix.stall_cue { "  [stall horn]" } else { "" }
            ));
        });

        egui::SidePanel::left("pad").show(ctx, |ui| {
            ui.label("Stick");
            egui::Grid::new("stick").show(ui, |ui| {
                ui.label("");
                pad_button(ui, Button::Up, &mut down_now);
                ui.label("");
                ui.end_row();
                pad_button(ui, Button::Left, &mut down_now);
                tap_button(ui, Button::Center, &self.sender);
                pad_button(ui, Button::Right, &mut down_now);
                ui.end_row();
                ui.label("");
                pad_button(ui, Button::Down, &mut down_now);
                ui.label("");
                ui.end_row();
            });
            ui.separator();
            ui.label("Rudder");
            ui.horizontal(|ui| {
                pad_button(ui, Button::RudderLeft, &mut down_now);
                pad_button(ui, Button::RudderRight, &mut down_now);
            });
            ui.separator();
            ui.horizontal(|ui| {
                tap_button(ui, Button::ThrottleDown, &self.sender);
                tap_button(ui, Button::ThrottleUp, &self.sender);
            });
            ui.horizontal(|ui| {
                tap_button(ui, Button::Camera, &self.sender);
                tap_button(ui, Button::Reset, &self.sender);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y - 24.0;

            ui.horizontal(|ui| {
                // Altitude vs Time
                ui.vertical(|ui| {
                    ui.label("Altitude above ground (m)");
                    let points: PlotPoints = self.history.iter()
                        .map(|s| [s.time, s.altitude_above_ground])
                        .collect();
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                // Speed vs Time
                ui.vertical(|ui| {
                    ui.label("Speed (m/s)");
                    let points: PlotPoints = self.history.iter()
                        .map(|s| [s.time, s.speed])
                        .collect();
                    Plot::new("speed")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Speed", points));
                        });
                });
            });
        });

        self.poll_input(ctx, down_now);
        // One fixed tick per frame; a slow frame slows the simulation
        self.step();
        ctx.request_repaint();
    }
}
