//! Visual state snapshots handed to the host renderer.
//!
//! Experiments never draw. After each advance the controller can produce a
//! [`VisualState`]: plain data describing shapes, colors, opacities and
//! transforms for the active experiment. A host paints it however it likes.
//! The bundled egui viewer is one such host.
//!
//! Angles are in degrees, lengths in canvas pixels and colors are [`Hsla`].
//!
//! # Usage
//!
//! ```ignore
//! match lab.snapshot() {
//!     VisualState::InteractiveParticles(view) => {
//!         let instances = view.instances();
//!         queue.write_buffer(&buffer, 0, bytemuck::cast_slice(&instances));
//!     }
//!     other => paint_shapes(&other),
//! }
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

use crate::experiment::ExperimentKind;

/// Wrap a hue in degrees into `[0, 360)`.
#[inline]
pub fn wrap_hue(hue: f32) -> f32 {
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 || !h.is_finite() {
        0.0
    } else {
        h
    }
}

/// Reduce an accumulated angle in degrees to `[0, 360)` for display.
///
/// Accumulators stay in `f64`; only the reduced angle is narrowed to `f32`.
#[inline]
pub fn wrap_angle(degrees: f64) -> f32 {
    wrap_hue(degrees.rem_euclid(360.0) as f32)
}

/// Color in hue/saturation/lightness with alpha.
///
/// Hue is in degrees and always stored in `[0, 360)`. Saturation, lightness
/// and alpha are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsla {
    pub h: f32,
    pub s: f32,
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    /// Opaque color. Hue wraps, the other channels clamp.
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self::with_alpha(h, s, l, 1.0)
    }

    pub fn with_alpha(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self {
            h: wrap_hue(h),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different alpha.
    pub fn alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to linear-agnostic RGBA fractions.
    pub fn to_rgba(self) -> [f32; 4] {
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        let hp = self.h / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.l - c / 2.0;
        [r + m, g + m, b + m, self.a]
    }

    /// Convert to 8-bit RGBA (unmultiplied alpha).
    pub fn to_rgba8(self) -> [u8; 4] {
        self.to_rgba().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// One drawable dot for instanced renderers.
///
/// Trails and particle heads flatten into the same record so a renderer can
/// upload them with a single `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub size: f32,
    pub glow: f32,
    pub color: [f32; 4],
}

// ========== Color Harmonics ==========

#[derive(Debug, Clone, Serialize)]
pub struct ColorHarmonicsView {
    pub hue: f32,
    pub pattern: usize,
    pub pattern_name: &'static str,
    /// 64 cells, row-major over an 8×8 grid.
    pub cells: Vec<CellView>,
    pub explosions: Vec<ExplosionView>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CellView {
    pub row: usize,
    pub col: usize,
    pub color: Hsla,
    pub rotation: f32,
    pub scale: f32,
    pub glow: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExplosionView {
    pub id: u64,
    pub position: Vec2,
    pub color: Hsla,
    /// Fraction of the effect's lifetime already spent, in `[0, 1]`.
    pub age: f32,
}

// ========== Motion Studies ==========

#[derive(Debug, Clone, Serialize)]
pub struct MotionStudiesView {
    pub time: f32,
    pub magnetism: f32,
    pub rings: Vec<RingView>,
    pub core: OrbView,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RingView {
    pub diameter: f32,
    pub opacity: f32,
    pub rotation: f32,
    pub scale: f32,
    pub color: Hsla,
    pub stroke: f32,
    pub blur: f32,
}

/// Pulsing center disc shared by the ring experiments.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrbView {
    pub scale: f32,
    pub rotation: f32,
}

// ========== Typography Lab ==========

#[derive(Debug, Clone, Serialize)]
pub struct TypographyView {
    pub word: &'static str,
    pub text_index: usize,
    pub words: &'static [&'static str],
    pub glitching: bool,
    pub rainbow: bool,
    pub scale: f32,
    pub skew: f32,
}

// ========== Interactive Particles ==========

#[derive(Debug, Clone, Serialize)]
pub struct ParticlesView {
    /// Size of the toroidal frame particles live in.
    pub frame: Vec2,
    pub particles: Vec<ParticleView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub id: usize,
    pub position: Vec2,
    pub size: f32,
    pub color: Hsla,
    pub glow: f32,
    /// Oldest first. Width and opacity grow towards the newest point.
    pub trail: Vec<TrailDot>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrailDot {
    pub position: Vec2,
    pub size: f32,
    pub alpha: f32,
}

impl ParticlesView {
    /// Flatten trails and heads into instance records, back to front.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        let mut out = Vec::with_capacity(self.particles.iter().map(|p| p.trail.len() + 1).sum());
        for particle in &self.particles {
            for dot in &particle.trail {
                out.push(ParticleInstance {
                    position: dot.position.to_array(),
                    size: dot.size,
                    glow: 0.0,
                    color: particle.color.alpha(dot.alpha).to_rgba(),
                });
            }
            out.push(ParticleInstance {
                position: particle.position.to_array(),
                size: particle.size,
                glow: particle.glow,
                color: particle.color.to_rgba(),
            });
        }
        out
    }
}

// ========== Sound Visualizer ==========

#[derive(Debug, Clone, Serialize)]
pub struct SoundView {
    pub beat: bool,
    /// Whole-visualizer scale; pops while a beat is active.
    pub scale: f32,
    pub bars: Vec<BarView>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BarView {
    pub height: f32,
    pub display_height: f32,
    /// Gradient stops bottom to top.
    pub gradient: [Hsla; 3],
    pub scale_y: f32,
}

// ========== Geometry Lab ==========

#[derive(Debug, Clone, Serialize)]
pub struct GeometryView {
    pub rotation: f32,
    pub complexity: u32,
    pub rings: Vec<GeometryRingView>,
    pub core: OrbView,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeometryRingView {
    pub inset: f32,
    pub rotation: f32,
    pub color: Hsla,
    pub stroke: f32,
    pub blur: f32,
    pub glow: f32,
}

/// Snapshot of the active experiment, tagged by variant.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "experiment", rename_all = "snake_case")]
pub enum VisualState {
    ColorHarmonics(ColorHarmonicsView),
    MotionStudies(MotionStudiesView),
    TypographyLab(TypographyView),
    InteractiveParticles(ParticlesView),
    SoundVisualizer(SoundView),
    GeometryLab(GeometryView),
}

impl VisualState {
    /// Which experiment produced this snapshot.
    pub fn kind(&self) -> ExperimentKind {
        match self {
            VisualState::ColorHarmonics(_) => ExperimentKind::ColorHarmonics,
            VisualState::MotionStudies(_) => ExperimentKind::MotionStudies,
            VisualState::TypographyLab(_) => ExperimentKind::TypographyLab,
            VisualState::InteractiveParticles(_) => ExperimentKind::InteractiveParticles,
            VisualState::SoundVisualizer(_) => ExperimentKind::SoundVisualizer,
            VisualState::GeometryLab(_) => ExperimentKind::GeometryLab,
        }
    }
}
