//! Interactive attractor-tracking viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the active scene and the
//! settings it was built from, and implements [`eframe::App`] to draw and
//! control it through an egui UI.

use crate::scenes::{ActiveScene, CameraLook, SceneKind, SceneSettings, blink};
use eframe::App;
use egui::{Color32, Stroke};
use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracker_core::{
    ConfigError, Pattern, TrackingAgent, geometry::Rgb, scene::Scene, tunnel::project_orb,
};

/// Main application state for the interactive viewer.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions (scene, pattern, speed, population).
/// 2. If `running` is `true`, advance the scene by one fixed tick.
/// 3. Draw the population and the attractor.
///
/// ### Fields
/// - `settings` - Knobs the current scene was built from.
/// - `scene` - The running scene.
/// - `running` - Whether the scene auto-advances every frame.
/// - `ticks` - Ticks run since the last rebuild.
/// - `last_error` - Message from the last failed rebuild, if any.
pub struct Viewer {
    settings: SceneSettings,
    scene: ActiveScene,
    running: bool,
    ticks: u64,
    last_error: Option<String>,
}

impl Viewer {
    /// Creates a viewer running the default camera scene.
    pub fn new() -> Result<Self, ConfigError> {
        let settings = SceneSettings::default();
        let scene = ActiveScene::build(&settings, StdRng::seed_from_u64(settings.seed))?;
        Ok(Self {
            settings,
            scene,
            running: true,
            ticks: 0,
            last_error: None,
        })
    }

    /// Rebuilds the scene from the current settings.
    ///
    /// On a configuration error the previous scene keeps running and the
    /// error is shown in the status bar.
    fn rebuild(&mut self) {
        match ActiveScene::build(&self.settings, StdRng::seed_from_u64(self.settings.seed)) {
            Ok(scene) => {
                self.scene = scene;
                self.ticks = 0;
                self.last_error = None;
            }
            Err(err) => {
                log::warn!("scene rebuild failed: {err}");
                self.last_error = Some(err.to_string());
            }
        }
    }

    /// Rebuilds with a fresh random seed.
    fn reseed(&mut self) {
        self.settings.seed = rand::rng().random();
        self.rebuild();
    }

    /// Advances the scene by a single tick.
    fn step_once(&mut self) {
        self.scene.step();
        self.ticks += 1;
    }

    /// Maps a normalized `[0, 1]²` position into `rect`.
    fn norm_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(
            rect.min.x + p.x * rect.width(),
            rect.min.y + p.y * rect.height(),
        )
    }

    /// Inverse of [`Viewer::norm_to_screen`].
    fn screen_to_norm(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(
            (p.x - rect.min.x) / rect.width(),
            (p.y - rect.min.y) / rect.height(),
        )
    }

    /// Builds the top panel UI (run controls, stepping, scene and pattern).
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
                if ui.button("Reset").clicked() {
                    self.rebuild();
                }
                if ui.button("Reseed").clicked() {
                    self.reseed();
                }

                ui.separator();
                let before = self.settings.kind;
                egui::ComboBox::from_label("Scene")
                    .selected_text(self.settings.kind.label())
                    .show_ui(ui, |ui| {
                        for kind in SceneKind::ALL {
                            ui.selectable_value(&mut self.settings.kind, kind, kind.label());
                        }
                    });
                if self.settings.kind != before {
                    self.rebuild();
                }

                let before = self.settings.pattern;
                egui::ComboBox::from_label("Pattern")
                    .selected_text(self.settings.pattern.name())
                    .show_ui(ui, |ui| {
                        for pattern in Pattern::ALL {
                            ui.selectable_value(&mut self.settings.pattern, pattern, pattern.name());
                        }
                    });
                if self.settings.pattern != before {
                    self.scene.set_pattern(self.settings.pattern);
                }

                if ui
                    .add(egui::Slider::new(&mut self.settings.speed, 0.0..=5.0).text("Speed"))
                    .changed()
                {
                    self.scene.set_speed(self.settings.speed);
                }
            });
        });
    }

    /// Builds the bottom status bar (entities, attractor, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("ticks = {}", self.ticks));
                ui.label(format!("entities = {}", self.scene.entity_count()));
                if let Some(a) = self.scene.attractor() {
                    ui.separator();
                    ui.label(format!("t = {:.2}", a.time));
                    ui.label(format!("attractor = ({:.3}, {:.3})", a.pos.x, a.pos.y));
                }
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
            });
        });
    }

    /// Builds the right-hand panel for population parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Population");

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("instances:");
                    ui.add(
                        egui::DragValue::new(&mut self.settings.instance_count)
                            .range(0..=400)
                            .speed(1.0),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("jitter:");
                    ui.add(
                        egui::DragValue::new(&mut self.settings.jitter)
                            .range(0.0..=0.2)
                            .speed(0.005),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label("aspect:");
                    ui.add(
                        egui::DragValue::new(&mut self.settings.aspect)
                            .range(0.25..=4.0)
                            .speed(0.01),
                    );
                });

                ui.separator();
                if ui.button("Apply").clicked() {
                    self.rebuild();
                }
                if ui.button("Reset settings").clicked() {
                    self.settings = SceneSettings::default();
                    self.rebuild();
                }
            });
    }

    /// Builds the central panel where the scene is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
            let rect = response.rect;
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, Color32::from_rgb(12, 14, 22));

            if self.running {
                self.step_once();
                ctx.request_repaint();
            }

            match &self.scene {
                ActiveScene::Cameras(scene) => draw_cameras(&painter, rect, scene),
                ActiveScene::Flowers(scene) => {
                    for agent in &scene.agents {
                        draw_flower(&painter, rect, agent.pos, agent.angle, agent.scale, agent.phase);
                    }
                }
                ActiveScene::Pendulums { scene, .. } => {
                    for agent in &scene.agents {
                        draw_pendulum(&painter, rect, agent.pos, agent.angle, agent.scale);
                    }
                }
                ActiveScene::Tunnel(tunnel) => {
                    draw_tunnel(&painter, rect, tunnel);
                }
            }

            if let Some(a) = self.scene.attractor() {
                let p = Self::norm_to_screen(a.pos, rect);
                painter.circle_filled(p, 6.0, Color32::YELLOW);
                painter.circle_stroke(p, 12.0, Stroke::new(1.0, Color32::from_rgb(255, 220, 80)));
            }

            if let Some(hover) = response.hover_pos() {
                let n = Self::screen_to_norm(hover, rect);
                painter.text(
                    rect.left_top() + egui::vec2(8.0, 8.0),
                    egui::Align2::LEFT_TOP,
                    format!("({:.2}, {:.2})", n.x, n.y),
                    egui::FontId::monospace(12.0),
                    Color32::GRAY,
                );
            }
        });
    }
}

fn draw_cameras(painter: &egui::Painter, rect: egui::Rect, scene: &Scene<CameraLook>) {
    let t = scene.attractor.time;
    for agent in &scene.agents {
        draw_camera(painter, rect, agent, t);
    }
}

fn draw_camera(painter: &egui::Painter, rect: egui::Rect, agent: &TrackingAgent<CameraLook>, t: f32) {
    let p = Viewer::norm_to_screen(agent.pos, rect);
    let len = 14.0 * agent.scale;
    let dir = egui::vec2(agent.angle.cos(), agent.angle.sin());
    painter.circle_filled(p, 6.0 * agent.scale, Color32::from_gray(70));
    painter.line_segment([p, p + dir * len], Stroke::new(4.0 * agent.scale, Color32::from_gray(150)));
    let lens = if blink(&agent.ext, agent.phase, t) > 0.5 {
        Color32::from_rgb(255, 60, 60)
    } else {
        Color32::from_gray(40)
    };
    painter.circle_filled(p + dir * len, 2.5 * agent.scale, lens);
}

fn draw_flower(painter: &egui::Painter, rect: egui::Rect, pos: Vec2, angle: f32, scale: f32, phase: f32) {
    let base = Viewer::norm_to_screen(pos, rect);
    let head = base + egui::vec2(angle.cos(), angle.sin()) * 16.0 * scale;
    painter.line_segment([base, head], Stroke::new(1.5, Color32::from_rgb(70, 160, 80)));
    let hue = phase / std::f32::consts::TAU;
    let petal = egui::ecolor::Hsva::new(hue, 0.6, 0.95, 1.0);
    painter.circle_filled(head, 5.0 * scale, Color32::from(petal));
}

fn draw_pendulum(painter: &egui::Painter, rect: egui::Rect, pivot: Vec2, angle: f32, scale: f32) {
    let p = Viewer::norm_to_screen(pivot, rect);
    let len = 0.4 * rect.height() / 3.0 * scale.min(1.0);
    let bob = p + egui::vec2(angle.sin(), angle.cos()) * len;
    painter.line_segment([p, bob], Stroke::new(1.0, Color32::from_gray(180)));
    painter.circle_filled(p, 2.0, Color32::from_gray(120));
    painter.circle_filled(bob, 6.0 * scale, Color32::from_rgb(200, 170, 90));
}

fn draw_tunnel(painter: &egui::Painter, rect: egui::Rect, tunnel: &crate::scenes::TunnelScene) {
    let (w, h) = (rect.width(), rect.height());
    let cfg = &tunnel.system.cfg;
    for (orb, proj) in tunnel.system.orbs.iter().zip(tunnel.system.projections(w, h)) {
        if proj.alpha <= 0.0 {
            continue;
        }
        let Rgb { r, g, b } = tunnel.palette[orb.color_index % tunnel.palette.len()];
        let a = (proj.alpha * 255.0) as u8;
        let head = rect.min + egui::vec2(proj.screen_x, proj.screen_y);

        // Trail towards where the orb was a moment ago.
        let behind = tracker_core::tunnel::TunnelOrb {
            z: orb.z + 0.03 * orb.trail,
            ..*orb
        };
        let tail = project_orb(&behind, w, h, cfg);
        let tail = rect.min + egui::vec2(tail.screen_x, tail.screen_y);
        painter.line_segment(
            [tail, head],
            Stroke::new(
                (proj.apparent_size * 0.3).max(1.0),
                Color32::from_rgba_unmultiplied(r, g, b, a / 3),
            ),
        );
        painter.circle_filled(
            head,
            (proj.apparent_size * 0.5).max(1.0),
            Color32::from_rgba_unmultiplied(r, g, b, a),
        );
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(10.0, 20.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn norm_to_screen_and_back_is_roundtrip() {
        let rect = test_rect();
        let eps = 1e-5;
        for p in [Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.5), Vec2::new(0.9, 0.1)] {
            let screen = Viewer::norm_to_screen(p, rect);
            let back = Viewer::screen_to_norm(screen, rect);
            assert!(
                (back - p).abs().max_element() < eps,
                "roundtrip mismatch: p={p:?}, back={back:?}"
            );
        }
        assert_eq!(Viewer::norm_to_screen(Vec2::ONE, rect), rect.max);
    }

    #[test]
    fn step_once_advances_attractor_and_ticks() {
        let mut viewer = Viewer::new().unwrap();
        let t0 = viewer.scene.attractor().map(|a| a.time).unwrap();
        viewer.step_once();
        viewer.step_once();
        let t1 = viewer.scene.attractor().map(|a| a.time).unwrap();
        assert!(t1 > t0);
        assert_eq!(viewer.ticks, 2);
    }

    #[test]
    fn rebuild_resets_ticks_and_switches_scene() {
        let mut viewer = Viewer::new().unwrap();
        viewer.step_once();
        viewer.settings.kind = SceneKind::Tunnel;
        viewer.rebuild();
        assert_eq!(viewer.ticks, 0);
        assert!(matches!(viewer.scene, ActiveScene::Tunnel(_)));
        assert!(viewer.scene.attractor().is_none());
    }

    #[test]
    fn failed_rebuild_keeps_previous_scene() {
        let mut viewer = Viewer::new().unwrap();
        let count = viewer.scene.entity_count();
        viewer.settings.instance_count = 0;
        viewer.rebuild();
        assert!(viewer.last_error.is_some());
        assert_eq!(viewer.scene.entity_count(), count);
    }
}
