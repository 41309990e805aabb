//! Color Harmonics: a hue-cycling 8×8 grid with click-spawned explosions.
//!
//! Every 50ms tick the base hue advances by 2°. Each cell offsets the hue by
//! its index times the active pattern's multiplier. Each click spawns one
//! explosion at a random point on the canvas that removes itself exactly
//! 1000ms later, independent of any other explosion.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;

use crate::config::LabConfig;
use crate::experiment::{Behavior, Command, Context, Experiment, ExperimentKind, Mounted};
use crate::input::{InputDelta, InputField};
use crate::visuals::{wrap_hue, CellView, ColorHarmonicsView, ExplosionView, Hsla, VisualState};

/// Pattern names and their per-cell hue multipliers.
pub const PATTERNS: [(&str, f32); 3] = [("Spiral", 15.0), ("Grid", 45.0), ("Wave", 72.0)];

const GRID: usize = 8;
const HUE_STEP: f32 = 2.0;
const CADENCE: Duration = Duration::from_millis(50);
pub const EXPLOSION_LIFETIME: Duration = Duration::from_millis(1000);

/// A short-lived burst owned by the instance that spawned it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionEffect {
    pub id: u64,
    pub position: Vec2,
    pub hue: f32,
    pub created_at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorEvent {
    Expire(u64),
}

#[derive(Debug)]
pub struct ColorHarmonics {
    hue: f32,
    pattern: usize,
    explosions: Vec<ExplosionEffect>,
    next_id: u64,
    canvas: Vec2,
}

impl ColorHarmonics {
    pub fn new(config: &LabConfig) -> Self {
        Self {
            hue: 0.0,
            pattern: 0,
            explosions: Vec::new(),
            next_id: 0,
            canvas: Vec2::new(config.canvas_width.max(1.0), config.canvas_height.max(1.0)),
        }
    }

    /// Registry constructor.
    pub fn mount(config: &LabConfig, input: &InputField, now: Duration) -> Box<dyn Experiment> {
        Box::new(Mounted::new(Self::new(config), input, now))
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn pattern(&self) -> usize {
        self.pattern
    }

    pub fn explosions(&self) -> &[ExplosionEffect] {
        &self.explosions
    }

    fn spawn_explosion(&mut self, cx: &mut Context<'_, ColorEvent>) {
        let mut rng = rand::thread_rng();
        let effect = ExplosionEffect {
            id: self.next_id,
            position: Vec2::new(
                rng.gen_range(0.0..self.canvas.x),
                rng.gen_range(0.0..self.canvas.y),
            ),
            hue: rng.gen_range(0.0..360.0),
            created_at: cx.now,
        };
        self.next_id += 1;
        cx.timers.schedule(cx.now, EXPLOSION_LIFETIME, ColorEvent::Expire(effect.id));
        log::debug!("explosion {} at ({:.0}, {:.0})", effect.id, effect.position.x, effect.position.y);
        self.explosions.push(effect);
    }
}

impl Behavior for ColorHarmonics {
    type Event = ColorEvent;
    const KIND: ExperimentKind = ExperimentKind::ColorHarmonics;

    fn cadence(&self) -> Duration {
        CADENCE
    }

    fn on_tick(&mut self, _cx: &mut Context<'_, ColorEvent>) {
        self.hue = wrap_hue(self.hue + HUE_STEP);
    }

    fn on_input(&mut self, delta: InputDelta, cx: &mut Context<'_, ColorEvent>) {
        for _ in 0..delta.clicks {
            self.spawn_explosion(cx);
        }
    }

    fn on_timer(&mut self, event: ColorEvent, _cx: &mut Context<'_, ColorEvent>) {
        let ColorEvent::Expire(id) = event;
        self.explosions.retain(|e| e.id != id);
    }

    fn on_command(&mut self, command: Command, _cx: &mut Context<'_, ColorEvent>) -> bool {
        match command {
            Command::SelectPattern(index) if index < PATTERNS.len() => {
                self.pattern = index;
                true
            }
            _ => false,
        }
    }

    fn view(&self, now: Duration) -> VisualState {
        let (pattern_name, multiplier) = PATTERNS[self.pattern];
        let cells = (0..GRID * GRID)
            .map(|i| {
                let fi = i as f32;
                let wave = (self.hue * 0.1 + fi).sin();
                CellView {
                    row: i / GRID,
                    col: i % GRID,
                    color: Hsla::new(self.hue + fi * multiplier, 0.7, 0.6),
                    rotation: self.hue + fi * 5.0,
                    scale: 1.0 + wave * 0.2,
                    glow: 20.0 + wave * 10.0,
                }
            })
            .collect();

        let explosions = self
            .explosions
            .iter()
            .map(|e| ExplosionView {
                id: e.id,
                position: e.position,
                color: Hsla::new(e.hue, 1.0, 0.5),
                age: (now.saturating_sub(e.created_at).as_secs_f32()
                    / EXPLOSION_LIFETIME.as_secs_f32())
                .clamp(0.0, 1.0),
            })
            .collect();

        VisualState::ColorHarmonics(ColorHarmonicsView {
            hue: self.hue,
            pattern: self.pattern,
            pattern_name,
            cells,
            explosions,
        })
    }
}
