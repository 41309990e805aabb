//! # Canvas Lab
//!
//! Interactive procedural-animation experiments driven by a shared clock.
//!
//! The lab holds six experiments. Exactly one is mounted at a time. A host
//! (window, test, headless script) feeds pointer and click input, moves time
//! forward, and paints whatever [`VisualState`] the active experiment describes.
//! Nothing here touches a GPU or a window directly.
//!
//! ## Quick Start
//!
//! ```ignore
//! use canvas_lab::prelude::*;
//! use std::time::Duration;
//!
//! let mut lab = SimulationController::new(LabConfig::default())?;
//! lab.select(3)?;            // Interactive Particles
//! lab.play();
//!
//! lab.set_pointer(300.0, 300.0);
//! lab.register_click();
//! lab.advance(Duration::from_millis(16));
//!
//! if let VisualState::InteractiveParticles(view) = lab.snapshot() {
//!     for p in &view.particles {
//!         println!("{:?}", p.position);
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Time
//!
//! Time is virtual. Every experiment owns a [`Clock`] with a fixed cadence and
//! a queue of one-shot [`Timers`]. Both only move when the host calls
//! [`SimulationController::advance`]. Pausing stops the clock but lets pending
//! timers finish, so an explosion started before a pause still fades.
//!
//! ### Input
//!
//! The [`InputField`] is shared by every experiment and outlives them. Each
//! mounted experiment keeps a cursor into it and only reacts to clicks that
//! arrived after it was mounted.
//!
//! ### Experiments
//!
//! | Index | Experiment | Cadence | Reacts to |
//! |-------|------------|---------|-----------|
//! | 0 | [`ColorHarmonics`] | 50ms | clicks, pattern command |
//! | 1 | [`MotionStudies`] | 16ms | pointer |
//! | 2 | [`TypographyLab`] | 2500ms | text command |
//! | 3 | [`InteractiveParticles`] | 16ms | pointer |
//! | 4 | [`SoundVisualizer`] | 100ms | nothing |
//! | 5 | [`GeometryLab`] | 16ms | clicks |

pub mod config;
pub mod controller;
pub mod error;
pub mod experiment;
pub mod experiments;
pub mod headless;
pub mod input;
pub mod registry;
pub mod time;
pub mod timer;
#[cfg(feature = "egui")]
pub mod viewer;
pub mod visuals;

pub use config::LabConfig;
pub use controller::{HostEvent, LabStatus, RunState, SimulationController};
pub use error::{ConfigError, LabError};
pub use experiment::{Behavior, Command, Context, Experiment, ExperimentKind, Mounted};
pub use experiments::{
    ColorHarmonics, GeometryLab, InteractiveParticles, MotionStudies, Particle, SoundVisualizer, TypographyLab,
};
pub use glam::Vec2;
pub use input::{InputCursor, InputDelta, InputField};
pub use registry::{ExperimentEntry, ExperimentRegistry, EXPERIMENT_COUNT};
pub use time::{Clock, Time};
pub use timer::{TimerHandle, Timers};
pub use visuals::{Hsla, ParticleInstance, VisualState};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use canvas_lab::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::LabConfig;
    pub use crate::controller::{HostEvent, LabStatus, RunState, SimulationController};
    pub use crate::error::{ConfigError, LabError};
    pub use crate::experiment::{Command, Experiment, ExperimentKind};
    pub use crate::input::InputField;
    pub use crate::time::Time;
    pub use crate::visuals::{Hsla, VisualState};
    pub use crate::Vec2;
    #[cfg(feature = "egui")]
    pub use crate::viewer::LabViewer;
    #[cfg(feature = "egui")]
    pub use egui;
}
