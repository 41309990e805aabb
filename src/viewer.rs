//! Interactive egui viewer (feature `egui`).
//!
//! Paints every [`VisualState`] with the egui painter, forwards pointer
//! movement and clicks on the canvas to the controller, and offers the
//! selection, play/pause and reset controls in a top bar. Space toggles play.

use std::time::Duration;

use eframe::egui;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke};

use crate::config::LabConfig;
use crate::controller::SimulationController;
use crate::error::LabError;
use crate::experiment::Command;
use crate::experiments::color_harmonics::PATTERNS;
use crate::time::Time;
use crate::visuals::{
    ColorHarmonicsView, GeometryView, Hsla, MotionStudiesView, ParticlesView, SoundView, TypographyView, VisualState,
};

/// Longest step fed to the lab in one frame, so a stalled window does not
/// replay seconds of ticks at once.
const MAX_FRAME_STEP: Duration = Duration::from_millis(250);

fn color(c: Hsla) -> Color32 {
    let [r, g, b, a] = c.to_rgba8();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn rotated_square(center: Pos2, half: f32, degrees: f32) -> Vec<Pos2> {
    let (s, c) = degrees.to_radians().sin_cos();
    [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
        .into_iter()
        .map(|(x, y)| {
            let (x, y) = (x * half, y * half);
            Pos2::new(center.x + x * c - y * s, center.y + x * s + y * c)
        })
        .collect()
}

/// eframe application wrapping a [`SimulationController`].
pub struct LabViewer {
    lab: SimulationController,
    time: Time,
}

impl LabViewer {
    pub fn new(config: LabConfig) -> Result<Self, LabError> {
        Ok(Self {
            lab: SimulationController::new(config)?,
            time: Time::new(),
        })
    }

    pub fn lab(&self) -> &SimulationController {
        &self.lab
    }

    /// Switch experiments from a UI control. A rejected index is logged and
    /// leaves the lab untouched.
    pub fn select(&mut self, index: usize) -> bool {
        match self.lab.select(index) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("selection from viewer failed: {}", e);
                false
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let active = self.lab.active_index();
            let names: Vec<&'static str> = self.lab.registry().names().collect();
            for (index, name) in names.into_iter().enumerate() {
                if ui.selectable_label(index == active, name).clicked() && index != active {
                    self.select(index);
                }
            }
        });

        ui.horizontal(|ui| {
            let play_label = if self.lab.is_playing() { "Pause" } else { "Play" };
            if ui.button(play_label).clicked() {
                self.lab.toggle();
            }
            if ui.button("Reset").clicked() {
                self.lab.reset();
            }

            match self.lab.snapshot() {
                VisualState::ColorHarmonics(view) => {
                    ui.separator();
                    for (i, (name, _)) in PATTERNS.iter().enumerate() {
                        if ui.selectable_label(view.pattern == i, *name).clicked() {
                            self.lab.command(Command::SelectPattern(i));
                        }
                    }
                }
                VisualState::TypographyLab(view) => {
                    ui.separator();
                    for (i, word) in view.words.iter().enumerate() {
                        if ui.selectable_label(view.text_index == i, *word).clicked() {
                            self.lab.command(Command::SelectText(i));
                        }
                    }
                }
                _ => {}
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let status = self.lab.status();
                ui.label(format!(
                    "{}  |  interactions {}  |  {:.0} fps",
                    status.run_state.label(),
                    status.interactions,
                    self.time.fps()
                ));
            });
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, Color32::from_rgb(8, 8, 16));

        if let Some(pos) = response.hover_pos() {
            self.lab.set_pointer(pos.x - rect.left(), pos.y - rect.top());
        }
        if response.clicked() {
            self.lab.register_click();
        }

        match self.lab.snapshot() {
            VisualState::ColorHarmonics(view) => paint_color_harmonics(&painter, rect, &view),
            VisualState::MotionStudies(view) => paint_motion_studies(&painter, rect, &view),
            VisualState::TypographyLab(view) => paint_typography(&painter, rect, &view),
            VisualState::InteractiveParticles(view) => paint_particles(&painter, rect, &view),
            VisualState::SoundVisualizer(view) => paint_sound(&painter, rect, &view),
            VisualState::GeometryLab(view) => paint_geometry(&painter, rect, &view),
        }
    }
}

impl eframe::App for LabViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.lab.toggle();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        let delta = self.time.update().min(MAX_FRAME_STEP);
        self.lab.advance(delta);
        ctx.request_repaint();
    }
}

/// Open the viewer window and block until it closes.
pub fn run(config: LabConfig) -> Result<(), Box<dyn std::error::Error>> {
    let viewer = LabViewer::new(config.clone())?;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas_width, config.canvas_height + 64.0])
            .with_title("Canvas Lab"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };
    eframe::run_native("Canvas Lab", options, Box::new(|_cc| Ok(Box::new(viewer))))?;
    Ok(())
}

// ========== Painters ==========

fn paint_color_harmonics(painter: &Painter, rect: Rect, view: &ColorHarmonicsView) {
    let side = rect.width().min(rect.height()) * 0.8;
    let cell = side / 8.0;
    let origin = rect.center() - egui::vec2(side, side) * 0.5;

    for c in &view.cells {
        let center = origin + egui::vec2((c.col as f32 + 0.5) * cell, (c.row as f32 + 0.5) * cell);
        let half = cell * 0.4 * c.scale;
        painter.circle_filled(center, half + c.glow * 0.2, color(c.color.alpha(0.15)));
        painter.add(Shape::convex_polygon(
            rotated_square(center, half, c.rotation),
            color(c.color),
            Stroke::NONE,
        ));
    }

    for e in &view.explosions {
        let center = rect.min + egui::vec2(e.position.x, e.position.y);
        let radius = 10.0 + e.age * 60.0;
        painter.circle_stroke(center, radius, Stroke::new(3.0, color(e.color.alpha(1.0 - e.age))));
    }

    painter.text(
        rect.left_top() + egui::vec2(12.0, 12.0),
        Align2::LEFT_TOP,
        format!("{}  hue {:.0}", view.pattern_name, view.hue),
        FontId::monospace(14.0),
        Color32::LIGHT_GRAY,
    );
}

fn paint_motion_studies(painter: &Painter, rect: Rect, view: &MotionStudiesView) {
    let center = rect.center();
    for ring in &view.rings {
        let radius = ring.diameter * 0.5 * ring.scale;
        let c = color(ring.color.alpha(ring.opacity));
        if ring.blur > 0.0 {
            painter.circle_stroke(center, radius, Stroke::new(ring.stroke + ring.blur * 2.0, color(ring.color.alpha(ring.opacity * 0.2))));
        }
        painter.circle_stroke(center, radius, Stroke::new(ring.stroke, c));
        let (s, co) = ring.rotation.to_radians().sin_cos();
        painter.circle_filled(center + egui::vec2(co, s) * radius, ring.stroke + 1.0, c);
    }
    let core = 24.0 * view.core.scale;
    painter.add(Shape::convex_polygon(
        rotated_square(center, core, view.core.rotation),
        Color32::WHITE,
        Stroke::NONE,
    ));
}

fn paint_typography(painter: &Painter, rect: Rect, view: &TypographyView) {
    let size = 72.0 * view.scale;
    let center = rect.center();
    if view.glitching {
        for (offset, tint) in [(-4.0, Color32::from_rgb(255, 0, 80)), (4.0, Color32::from_rgb(0, 220, 255))] {
            painter.text(
                center + egui::vec2(offset, 0.0),
                Align2::CENTER_CENTER,
                view.word,
                FontId::proportional(size),
                tint,
            );
        }
    }
    let fill = if view.rainbow {
        color(Hsla::new(view.text_index as f32 * 45.0, 0.9, 0.6))
    } else {
        Color32::WHITE
    };
    painter.text(
        center + egui::vec2(view.skew, 0.0),
        Align2::CENTER_CENTER,
        view.word,
        FontId::proportional(size),
        fill,
    );
}

fn paint_particles(painter: &Painter, rect: Rect, view: &ParticlesView) {
    let origin = rect.center() - egui::vec2(view.frame.x, view.frame.y) * 0.5;
    for p in &view.particles {
        for dot in &p.trail {
            let pos = origin + egui::vec2(dot.position.x, dot.position.y);
            painter.circle_filled(pos, dot.size * 0.5, color(p.color.alpha(dot.alpha)));
        }
        let pos = origin + egui::vec2(p.position.x, p.position.y);
        painter.circle_filled(pos, p.size * 0.5 + p.glow * 0.25, color(p.color.alpha(0.2)));
        painter.circle_filled(pos, p.size * 0.5, color(p.color));
    }
}

fn paint_sound(painter: &Painter, rect: Rect, view: &SoundView) {
    let count = view.bars.len().max(1) as f32;
    let width = rect.width() * 0.8 * view.scale;
    let bar = width / count;
    let left = rect.center().x - width * 0.5;
    let floor = rect.center().y + 100.0;

    for (i, b) in view.bars.iter().enumerate() {
        let h = b.display_height * b.scale_y * view.scale;
        let x = left + i as f32 * bar;
        let thirds = h / 3.0;
        for (stop, c) in b.gradient.iter().enumerate() {
            let bottom = floor - stop as f32 * thirds;
            let segment = Rect::from_min_max(Pos2::new(x + 2.0, bottom - thirds), Pos2::new(x + bar - 2.0, bottom));
            painter.rect_filled(segment, 0.0, color(*c));
        }
    }
}

fn paint_geometry(painter: &Painter, rect: Rect, view: &GeometryView) {
    let center = rect.center();
    let outer = rect.width().min(rect.height()) * 0.45;
    for ring in &view.rings {
        let half = (outer - ring.inset).max(4.0);
        let points = rotated_square(center, half, ring.rotation);
        painter.add(Shape::closed_line(
            points.clone(),
            Stroke::new(ring.stroke.max(0.5) + ring.blur, color(ring.color.alpha(0.25))),
        ));
        painter.add(Shape::closed_line(points, Stroke::new(ring.stroke.max(0.5), color(ring.color))));
    }
    let core = 20.0 * view.core.scale;
    painter.add(Shape::convex_polygon(
        rotated_square(center, core, view.core.rotation),
        color(Hsla::new(view.rotation, 0.8, 0.7)),
        Stroke::NONE,
    ));
    painter.text(
        rect.left_top() + egui::vec2(12.0, 12.0),
        Align2::LEFT_TOP,
        format!("complexity {}", view.complexity),
        FontId::monospace(14.0),
        Color32::LIGHT_GRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_reports_rejection() {
        let mut viewer = LabViewer::new(LabConfig::default()).expect("default config is valid");
        assert!(viewer.select(3));
        assert_eq!(viewer.lab().active_index(), 3);

        let generation = viewer.lab().generation();
        assert!(!viewer.select(9));
        assert_eq!(viewer.lab().active_index(), 3);
        assert_eq!(viewer.lab().generation(), generation);
    }
}
