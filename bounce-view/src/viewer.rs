//! Interactive bouncing-body viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulation`] plus the
//! display state around it and implements [`eframe::App`] to step,
//! render and control the simulation through an egui UI.

use bounce_core::{
    config::Config, error::SimResult, phases::StepReport, simulation::Simulation,
};
use eframe::App;
use glam::Vec2;
use rand::{Rng, rng};
use tracing::{info, warn};

/// Frames between two frame-rate samples.
const FPS_SAMPLE_FRAMES: u64 = 60;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Simulation`] and a draft [`Config`] edited
///   in the side panel.
/// - Display options (color mode, collision highlighting, index bounds).
/// - eframe/egui callbacks for drawing and keyboard input.
///
/// The typical per-frame update is:
/// 1. Forward the drawing area size to [`Simulation::resize`].
/// 2. On the very first frame, spawn the starting bodies.
/// 3. If `running`, clear collision flags and step once.
/// 4. Draw the background, the bodies and optionally the quadtree.
///
/// ### Fields
/// - `sim` - The simulation being displayed.
/// - `cfg` - Draft configuration; applied when it differs from the
///   simulation's.
/// - `colors` - One display color per body, indexed like the bodies.
///
/// - `rng` - Random number generator used for spawning and colors.
///
/// - `running` - Whether the simulation advances every frame.
/// - `populated` - Whether the starting bodies were spawned.
/// - `color_mode` - Draw bodies in their own colors instead of white.
/// - `highlight` - Draw bodies that collided this step in green.
/// - `show_bounds` - Outline every quadtree node.
///
/// - `frame_count` - Frames drawn so far.
/// - `fps` - Last sampled frame rate.
/// - `last_frame_time` - egui time of the previous frame.
/// - `last_report` - Counters from the last step.
pub struct Viewer {
    sim: Simulation,
    cfg: Config,
    colors: Vec<egui::Color32>,

    rng: rand::rngs::ThreadRng,

    running: bool,
    populated: bool,
    color_mode: bool,
    highlight: bool,
    show_bounds: bool,

    frame_count: u64,
    fps: f64,
    last_frame_time: f64,
    last_report: StepReport,
}

impl Viewer {
    /// Creates a viewer around an empty simulation.
    ///
    /// The field starts at 800x800 and follows the window from the
    /// first frame on; bodies are spawned on that first frame so they
    /// fill the real drawing area.
    ///
    /// ### Returns
    /// The viewer, or the error from [`Simulation::new`] if `cfg` is invalid.
    pub fn new(cfg: Config) -> SimResult<Self> {
        let sim = Simulation::new(cfg, Vec2::new(800.0, 800.0))?;

        Ok(Self {
            sim,
            cfg,
            colors: Vec::new(),
            rng: rng(),
            running: true,
            populated: false,
            color_mode: true,
            highlight: true,
            show_bounds: true,
            frame_count: 0,
            fps: 0.0,
            last_frame_time: 0.0,
            last_report: StepReport::default(),
        })
    }

    /// Spawns `count` bodies, each with a random display color.
    fn spawn(&mut self, count: usize) {
        let ids = self.sim.spawn(count, &mut self.rng);
        self.colors
            .extend(ids.map(|_| random_color(&mut self.rng)));
    }

    /// Spawns the configured starting bodies once.
    fn populate(&mut self) {
        if self.populated {
            return;
        }
        self.spawn(self.sim.config().starting_bodies);
        self.populated = true;
        info!(bodies = self.sim.bodies().len(), "populated");
    }

    /// Advances the simulation by a single step.
    ///
    /// Flags from the previous step are cleared first so highlighting
    /// only shows this step's collisions.
    fn step_once(&mut self) {
        self.sim.clear_flags();
        self.last_report = self.sim.step();
    }

    /// Resizes the simulation field to the drawing area.
    fn sync_dims(&mut self, size: egui::Vec2) {
        let dims = Vec2::new(size.x, size.y);
        if dims == self.sim.dims() {
            return;
        }
        if let Err(err) = self.sim.resize(dims) {
            warn!(%err, "ignoring resize");
        }
    }

    /// Applies the draft config if it changed, reverting it if rejected.
    fn apply_config(&mut self) {
        if self.cfg == *self.sim.config() {
            return;
        }
        if let Err(err) = self.sim.set_config(self.cfg) {
            warn!(%err, "config rejected");
            self.cfg = *self.sim.config();
        }
    }

    /// Updates the frame counter and samples the frame rate every
    /// [`FPS_SAMPLE_FRAMES`] frames from the last frame interval.
    fn sample_fps(&mut self, now: f64) {
        let dt = now - self.last_frame_time;
        if self.frame_count % FPS_SAMPLE_FRAMES == 0 && dt > 0.0 {
            self.fps = 1.0 / dt;
        }
        self.last_frame_time = now;
        self.frame_count += 1;
    }

    /// Color for body `id`, honoring highlight and color mode.
    fn body_color(&self, id: usize) -> egui::Color32 {
        let flagged = self.sim.bodies().get(id).is_some_and(|b| b.flagged);
        if self.highlight && flagged {
            egui::Color32::GREEN
        } else if self.color_mode {
            self.colors.get(id).copied().unwrap_or(egui::Color32::WHITE)
        } else {
            egui::Color32::WHITE
        }
    }

    /// Space spawns a batch of bodies, Escape closes the window.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (space, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if space {
            self.spawn(self.sim.config().spawn_batch);
        }
        if escape {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, display toggles).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui
                    .button(format!("Spawn {}", self.sim.config().spawn_batch))
                    .clicked()
                {
                    self.spawn(self.sim.config().spawn_batch);
                }

                ui.separator();
                ui.checkbox(&mut self.color_mode, "Colors");
                ui.checkbox(&mut self.highlight, "Highlight collisions");
                ui.checkbox(&mut self.show_bounds, "Quadtree");
            });
        });
    }

    /// Builds the bottom status bar (frame rate, counts of the last step).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("FPS: {}", self.fps as u32));
                ui.separator();
                ui.label(format!("bodies = {}", self.sim.bodies().len()));
                ui.label(format!("leaves = {}", self.last_report.leaves));
                ui.label(format!("pairs = {}", self.last_report.pairs_tested));
                ui.label(format!("collided = {}", self.last_report.collided.len()));
                ui.label(format!("unindexed = {}", self.last_report.dropped));
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Quadtree");
                Self::labeled_drag_usize(ui, "capacity:", &mut self.cfg.capacity, 1..=64, 0.2);
                Self::labeled_drag_u32(
                    ui,
                    "max_divisions:",
                    &mut self.cfg.max_divisions,
                    0..=16,
                    0.1,
                );

                ui.separator();
                ui.label("Spawning");
                Self::labeled_drag_f32(ui, "max_speed:", &mut self.cfg.max_speed, 0.0..=10.0, 0.05);
                Self::labeled_drag_u32(ui, "min_radius:", &mut self.cfg.min_radius, 1..=50, 0.2);
                Self::labeled_drag_u32(ui, "max_radius:", &mut self.cfg.max_radius, 1..=50, 0.2);
                Self::labeled_drag_usize(
                    ui,
                    "spawn_batch:",
                    &mut self.cfg.spawn_batch,
                    1..=1000,
                    1.0,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
        self.apply_config();
    }

    /// Builds the central panel where the field is stepped and drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;

                self.sync_dims(rect.size());
                self.populate();

                if self.running {
                    self.step_once();
                    ctx.request_repaint();
                }

                painter.rect_filled(rect, 0.0, egui::Color32::DARK_GRAY);

                for (id, body) in self.sim.bodies().iter().enumerate() {
                    painter.circle_filled(
                        to_screen(body.pos, rect),
                        body.radius,
                        self.body_color(id),
                    );
                }

                if self.show_bounds {
                    let stroke = egui::Stroke::new(1.0, egui::Color32::LIGHT_GRAY);
                    for node in self.sim.tree().nodes() {
                        let r = node.region();
                        let bounds = egui::Rect::from_min_max(
                            to_screen(r.min(), rect),
                            to_screen(r.max(), rect),
                        );
                        painter.rect_stroke(bounds, 0.0, stroke, egui::StrokeKind::Inside);
                    }
                }
            });
    }
}

/// Maps a field position to screen space; the field's origin is the
/// top-left corner of `rect` and y grows downward in both.
fn to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
    rect.min + egui::vec2(p.x, p.y)
}

/// Random shade between black and pink.
fn random_color(rng: &mut impl Rng) -> egui::Color32 {
    let t: f32 = rng.random();
    egui::Color32::from_rgb((255.0 * t) as u8, (182.0 * t) as u8, (193.0 * t) as u8)
}

impl App for Viewer {
    /// eframe callback that handles input and builds all UI panels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.sample_fps(now);
        self.handle_keys(ctx);

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
