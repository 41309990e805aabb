//! Scripted session for running the lab without a window.
//!
//! The script sweeps the pointer along a Lissajous curve over the canvas,
//! clicks every 700ms, and rotates through every experiment starting at
//! `initial_experiment`. Status is written as one JSON object per line.
//!
//! ```text
//! {"experiment":"Geometry Lab","index":5,"interactions":7,"run_state":"Playing","elapsed_ms":4500,"detail":{"complexity":8,"rotation":123.0}}
//! ```

use std::io::Write;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::LabConfig;
use crate::controller::{LabStatus, SimulationController};
use crate::error::LabError;
use crate::registry::EXPERIMENT_COUNT;
use crate::time::Time;
use crate::visuals::VisualState;
use crate::Vec2;

const CLICK_EVERY: Duration = Duration::from_millis(700);

#[derive(Serialize)]
struct Report {
    #[serde(flatten)]
    status: LabStatus,
    detail: Value,
}

/// Pointer position at `t` seconds into the script.
pub fn sweep(t: f32, config: &LabConfig) -> Vec2 {
    let (w, h) = (config.canvas_width, config.canvas_height);
    Vec2::new(w * 0.5 + w * 0.4 * (t * 0.9).sin(), h * 0.5 + h * 0.4 * (t * 1.3).sin())
}

/// A few headline numbers from a snapshot.
pub fn summarize(state: &VisualState) -> Value {
    match state {
        VisualState::ColorHarmonics(v) => json!({
            "hue": v.hue,
            "pattern": v.pattern_name,
            "explosions": v.explosions.len(),
        }),
        VisualState::MotionStudies(v) => json!({ "time": v.time, "magnetism": v.magnetism }),
        VisualState::TypographyLab(v) => json!({
            "word": v.word,
            "glitching": v.glitching,
            "rainbow": v.rainbow,
        }),
        VisualState::InteractiveParticles(v) => {
            let trail: usize = v.particles.iter().map(|p| p.trail.len()).sum();
            json!({ "particles": v.particles.len(), "trail_dots": trail })
        }
        VisualState::SoundVisualizer(v) => {
            let peak = v.bars.iter().map(|b| b.height).fold(0.0f32, f32::max);
            json!({ "beat": v.beat, "peak": peak })
        }
        VisualState::GeometryLab(v) => json!({ "complexity": v.complexity, "rotation": v.rotation }),
    }
}

fn report(out: &mut impl Write, lab: &SimulationController) -> Result<(), LabError> {
    let line = Report {
        status: lab.status(),
        detail: summarize(&lab.snapshot()),
    };
    serde_json::to_writer(&mut *out, &line).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

/// Run the scripted session and return the final status.
pub fn run(config: &LabConfig, out: &mut impl Write) -> Result<LabStatus, LabError> {
    let mut lab = SimulationController::new(config.clone())?;
    lab.play();

    let step = Duration::from_millis(config.frame_step_ms);
    let total = Duration::from_millis((config.run_seconds * 1000.0).round() as u64);
    let report_every = Duration::from_millis(config.report_every_ms.max(1));
    let dwell = (total / EXPERIMENT_COUNT as u32).max(step);

    let mut time = Time::new();
    let mut next_click = CLICK_EVERY;
    let mut next_report = Duration::ZERO;

    log::info!(
        "headless run: {:.1}s in {}ms steps, {}ms per experiment",
        total.as_secs_f32(),
        step.as_millis(),
        dwell.as_millis()
    );

    while time.elapsed() < total {
        let elapsed = time.elapsed();

        let slot = (elapsed.as_nanos() / dwell.as_nanos()) as usize;
        let index = (config.initial_experiment + slot) % EXPERIMENT_COUNT;
        if index != lab.active_index() {
            lab.select(index)?;
        }

        let pointer = sweep(elapsed.as_secs_f32(), config);
        lab.set_pointer(pointer.x, pointer.y);
        if elapsed >= next_click {
            lab.register_click();
            next_click += CLICK_EVERY;
        }

        lab.advance(time.advance(step));

        if lab.now() >= next_report {
            report(out, &lab)?;
            next_report += report_every;
        }
    }

    report(out, &lab)?;
    Ok(lab.status())
}
