//! Simulation controller: run state, active experiment and shared input.
//!
//! The controller is the only thing a host talks to. It owns the
//! [`InputField`], the play/pause state and exactly one mounted experiment.
//! Time only moves when the host calls [`SimulationController::advance`].
//!
//! # Example
//!
//! ```ignore
//! use canvas_lab::prelude::*;
//!
//! let mut lab = SimulationController::new(LabConfig::default())?;
//! lab.select(3)?;
//! lab.play();
//!
//! loop {
//!     lab.set_pointer(mouse.x, mouse.y);
//!     lab.advance(time.update());
//!     renderer.paint(&lab.snapshot());
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::config::LabConfig;
use crate::error::LabError;
use crate::experiment::{Command, Experiment, ExperimentKind};
use crate::input::InputField;
use crate::registry::ExperimentRegistry;
use crate::visuals::VisualState;

/// Whether the active experiment's clock is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Playing,
    Paused,
}

impl RunState {
    /// Label used by hosts in their status strip.
    pub fn label(self) -> &'static str {
        match self {
            RunState::Playing => "LIVE",
            RunState::Paused => "PAUSED",
        }
    }
}

/// Everything a host can tell the lab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMoved { x: f32, y: f32 },
    Click,
    Select(usize),
    TogglePlay,
    Play,
    Pause,
    Reset,
    Command(Command),
}

/// Summary of the lab for a host's status display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabStatus {
    pub experiment: &'static str,
    pub index: usize,
    pub interactions: u64,
    pub run_state: RunState,
    pub elapsed_ms: u64,
}

impl fmt::Display for LabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] interactions={} {}",
            self.experiment,
            self.index,
            self.interactions,
            self.run_state.label()
        )
    }
}

/// Owns run state, the active experiment and the shared input.
pub struct SimulationController {
    config: LabConfig,
    registry: ExperimentRegistry,
    input: InputField,
    run_state: RunState,
    active_index: usize,
    active: Box<dyn Experiment>,
    now: Duration,
    generation: u64,
}

impl SimulationController {
    /// Create a controller with the standard registry.
    pub fn new(config: LabConfig) -> Result<Self, LabError> {
        Self::with_registry(config, ExperimentRegistry::new())
    }

    /// Create a controller over a custom registry.
    ///
    /// `initial_experiment` is checked against this registry, not the standard one.
    pub fn with_registry(config: LabConfig, registry: ExperimentRegistry) -> Result<Self, LabError> {
        config.validate_settings()?;
        let input = InputField::new();
        let index = config.initial_experiment;
        let active = registry
            .instantiate(index, &config, &input, Duration::ZERO)
            .ok_or(LabError::InvalidIndex {
                index,
                len: registry.len(),
            })?;

        let mut lab = Self {
            run_state: RunState::Paused,
            active_index: index,
            active,
            config,
            registry,
            input,
            now: Duration::ZERO,
            generation: 1,
        };
        log::info!("mounted {} (generation {})", lab.active.kind(), lab.generation);
        if lab.config.start_playing {
            lab.play();
        }
        Ok(lab)
    }

    // ========== Queries ==========

    pub fn config(&self) -> &LabConfig {
        &self.config
    }

    pub fn registry(&self) -> &ExperimentRegistry {
        &self.registry
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_playing(&self) -> bool {
        self.run_state == RunState::Playing
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_kind(&self) -> ExperimentKind {
        self.active.kind()
    }

    pub fn active(&self) -> &dyn Experiment {
        self.active.as_ref()
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    /// Direct access for host adapters such as [`InputField::handle_event`].
    pub fn input_mut(&mut self) -> &mut InputField {
        &mut self.input
    }

    /// Time since the controller was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Mount counter. Increments every time a fresh instance is created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> VisualState {
        self.active.snapshot()
    }

    pub fn status(&self) -> LabStatus {
        LabStatus {
            experiment: self.active.kind().name(),
            index: self.active_index,
            interactions: self.input.click_count(),
            run_state: self.run_state,
            elapsed_ms: self.now.as_millis() as u64,
        }
    }

    // ========== Input ==========

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.input.set_pointer(x, y);
    }

    pub fn register_click(&mut self) {
        self.input.register_click();
    }

    // ========== Commands ==========

    /// Mount a fresh instance of the experiment at `index`.
    ///
    /// Out-of-range indices are rejected with [`LabError::InvalidIndex`] and
    /// change nothing. The input field carries over, and the run state is kept:
    /// if playing, the new instance starts ticking at once.
    pub fn select(&mut self, index: usize) -> Result<(), LabError> {
        let Some(active) = self.registry.instantiate(index, &self.config, &self.input, self.now) else {
            let err = LabError::InvalidIndex {
                index,
                len: self.registry.len(),
            };
            log::warn!("{}", err);
            return Err(err);
        };
        self.install(index, active);
        Ok(())
    }

    fn install(&mut self, index: usize, mut active: Box<dyn Experiment>) {
        if self.is_playing() {
            active.start();
        }
        // Dropping the old instance drops its clock and every pending timer.
        self.active = active;
        self.active_index = index;
        self.generation += 1;
        log::info!("mounted {} (generation {})", self.active.kind(), self.generation);
    }

    pub fn play(&mut self) {
        if self.run_state == RunState::Paused {
            self.run_state = RunState::Playing;
            self.active.start();
            log::info!("playing {}", self.active.kind());
        }
    }

    pub fn pause(&mut self) {
        if self.run_state == RunState::Playing {
            self.run_state = RunState::Paused;
            self.active.stop();
            log::info!("paused {}", self.active.kind());
        }
    }

    /// Flip between playing and paused. Returns the new state.
    pub fn toggle(&mut self) -> RunState {
        match self.run_state {
            RunState::Playing => self.pause(),
            RunState::Paused => self.play(),
        }
        self.run_state
    }

    /// Pause, zero the click count and mount a fresh first experiment.
    pub fn reset(&mut self) {
        self.pause();
        self.input.reset();
        if let Some(active) = self.registry.instantiate(0, &self.config, &self.input, self.now) {
            self.install(0, active);
        }
        log::info!("reset");
    }

    /// Forward an experiment-local selection. Returns `false` if it did not apply.
    pub fn command(&mut self, command: Command) -> bool {
        let applied = self.active.command(command, &self.input);
        if !applied {
            log::warn!("{:?} ignored by {}", command, self.active.kind());
        }
        applied
    }

    /// Apply any host event.
    pub fn handle(&mut self, event: HostEvent) -> Result<(), LabError> {
        match event {
            HostEvent::PointerMoved { x, y } => self.set_pointer(x, y),
            HostEvent::Click => self.register_click(),
            HostEvent::Select(index) => self.select(index)?,
            HostEvent::TogglePlay => {
                self.toggle();
            }
            HostEvent::Play => self.play(),
            HostEvent::Pause => self.pause(),
            HostEvent::Reset => self.reset(),
            HostEvent::Command(command) => {
                self.command(command);
            }
        }
        Ok(())
    }

    // ========== Time ==========

    /// Move time forward by `delta` and let the active experiment catch up.
    pub fn advance(&mut self, delta: Duration) {
        self.advance_to(self.now + delta);
    }

    /// Move time forward to `now`. Earlier instants are treated as no time passing.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
        self.active.advance(self.now, &self.input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab() -> SimulationController {
        SimulationController::new(LabConfig::default()).expect("default config is valid")
    }

    #[test]
    fn test_starts_paused_on_first_experiment() {
        let lab = lab();
        assert_eq!(lab.run_state(), RunState::Paused);
        assert_eq!(lab.active_index(), 0);
        assert_eq!(lab.active_kind(), ExperimentKind::ColorHarmonics);
        assert!(!lab.active().is_running());
    }

    #[test]
    fn test_config_can_start_playing() {
        let config = LabConfig::default().with_start_playing(true).with_initial_experiment(5);
        let lab = SimulationController::new(config).expect("valid");
        assert!(lab.is_playing());
        assert_eq!(lab.active_kind(), ExperimentKind::GeometryLab);
        assert!(lab.active().is_running());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = LabConfig::default().with_initial_experiment(42);
        assert!(matches!(
            SimulationController::new(config),
            Err(LabError::InvalidIndex { index: 42, len: 6 })
        ));

        let mut config = LabConfig::default();
        config.canvas_height = 0.0;
        assert!(matches!(SimulationController::new(config), Err(LabError::Config(_))));
    }

    #[test]
    fn test_initial_experiment_checked_against_registry() {
        let standard = ExperimentRegistry::new();
        let first = *standard.get(0).expect("entry");

        // Seven entries: index 6 is valid here even though the standard set has six
        let long = ExperimentRegistry::new().with_entry(first);
        let config = LabConfig::default().with_initial_experiment(6);
        let lab = SimulationController::with_registry(config, long).expect("in range");
        assert_eq!(lab.active_index(), 6);
        assert_eq!(lab.active_kind(), ExperimentKind::ColorHarmonics);

        // Two entries: index 3 passes the standard check but not this one
        let short = ExperimentRegistry::from_entries(vec![first, first]);
        let config = LabConfig::default().with_initial_experiment(3);
        assert!(matches!(
            SimulationController::with_registry(config, short),
            Err(LabError::InvalidIndex { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_play_pause_controls_clock() {
        let mut lab = lab();
        lab.play();
        assert!(lab.active().is_running());
        assert_eq!(lab.toggle(), RunState::Paused);
        assert!(!lab.active().is_running());
        assert_eq!(lab.toggle(), RunState::Playing);
        assert!(lab.active().is_running());
    }

    #[test]
    fn test_select_out_of_range_changes_nothing() {
        let mut lab = lab();
        lab.select(2).expect("valid");
        lab.play();
        let generation = lab.generation();

        let err = lab.select(6).unwrap_err();
        assert!(matches!(err, LabError::InvalidIndex { index: 6, len: 6 }));
        assert_eq!(lab.active_index(), 2);
        assert_eq!(lab.generation(), generation);
        assert!(lab.is_playing());
        assert!(lab.active().is_running());
    }

    #[test]
    fn test_select_keeps_run_state_and_input() {
        let mut lab = lab();
        lab.play();
        lab.set_pointer(12.0, 34.0);
        lab.register_click();

        lab.select(4).expect("valid");
        assert!(lab.is_playing());
        assert!(lab.active().is_running());
        assert_eq!(lab.input().click_count(), 1);
        assert_eq!(lab.input().pointer().x, 12.0);
    }

    #[test]
    fn test_clicks_before_mount_do_not_fire() {
        let mut lab = lab();
        lab.select(5).expect("valid");
        lab.register_click();
        lab.advance(Duration::ZERO);

        // Remount color harmonics after a click; the old click stays in the past
        lab.select(0).expect("valid");
        lab.advance(Duration::from_millis(10));
        let VisualState::ColorHarmonics(view) = lab.snapshot() else {
            panic!("wrong variant");
        };
        assert!(view.explosions.is_empty());
    }

    #[test]
    fn test_switch_discards_pending_timers() {
        let mut lab = lab();
        lab.register_click();
        lab.advance(Duration::ZERO);
        assert_eq!(lab.active().pending_timers(), 1);

        lab.select(1).expect("valid");
        assert_eq!(lab.active().pending_timers(), 0);
        lab.advance(Duration::from_secs(5));
        assert_eq!(lab.active_kind(), ExperimentKind::MotionStudies);
    }

    #[test]
    fn test_reset() {
        let mut lab = lab();
        lab.select(3).expect("valid");
        lab.play();
        lab.register_click();
        lab.register_click();
        lab.advance(Duration::from_millis(100));

        lab.reset();
        let status = lab.status();
        assert_eq!(status.run_state, RunState::Paused);
        assert_eq!(status.interactions, 0);
        assert_eq!(status.index, 0);
        assert_eq!(status.experiment, "Color Harmonics");
        assert!(!lab.active().is_running());
    }

    #[test]
    fn test_handle_events() {
        let mut lab = lab();
        lab.handle(HostEvent::PointerMoved { x: 5.0, y: 6.0 }).unwrap();
        lab.handle(HostEvent::Click).unwrap();
        lab.handle(HostEvent::TogglePlay).unwrap();
        assert!(lab.is_playing());
        lab.handle(HostEvent::Command(Command::SelectPattern(1))).unwrap();
        lab.handle(HostEvent::Select(2)).unwrap();
        lab.handle(HostEvent::Command(Command::SelectText(4))).unwrap();
        assert!(lab.handle(HostEvent::Select(99)).is_err());
        lab.handle(HostEvent::Pause).unwrap();

        assert_eq!(lab.input().click_count(), 1);
        assert_eq!(lab.active_kind(), ExperimentKind::TypographyLab);
        assert!(!lab.is_playing());
    }

    #[test]
    fn test_commands_only_apply_to_matching_experiment() {
        let mut lab = lab();
        assert!(lab.command(Command::SelectPattern(1)));
        assert!(!lab.command(Command::SelectText(1)));
        lab.select(2).unwrap();
        assert!(lab.command(Command::SelectText(1)));
        assert!(!lab.command(Command::SelectPattern(1)));
    }

    #[test]
    fn test_status_label() {
        let mut lab = lab();
        assert_eq!(lab.status().run_state.label(), "PAUSED");
        lab.play();
        assert_eq!(lab.status().run_state.label(), "LIVE");
        assert!(lab.status().to_string().contains("Color Harmonics"));
    }
}
