//! Lab configuration.
//!
//! Loaded from JSON or built in code with `with_*` methods. Every field has a
//! default, so a config file only needs the values it changes.
//!
//! ```json
//! { "canvas_width": 1024, "start_playing": true, "initial_experiment": 3 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::registry::EXPERIMENT_COUNT;

/// Host-level settings for a lab session.
///
/// The experiments' own constants (frame size, cadences, lifetimes) are fixed
/// and not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Width of the canvas region in pixels.
    pub canvas_width: f32,
    /// Height of the canvas region in pixels.
    pub canvas_height: f32,
    /// Whether the lab starts in the playing state.
    pub start_playing: bool,
    /// Registry index mounted at start.
    pub initial_experiment: usize,
    /// Step used by the headless runner, in milliseconds.
    pub frame_step_ms: u64,
    /// How long the headless runner runs, in seconds.
    pub run_seconds: f32,
    /// How often the headless runner prints a status line, in milliseconds.
    pub report_every_ms: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 500.0,
            start_playing: false,
            initial_experiment: 0,
            frame_step_ms: 16,
            run_seconds: 5.0,
            report_every_ms: 500,
        }
    }
}

impl LabConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas size in pixels.
    pub fn with_canvas_size(mut self, width: f32, height: f32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Start in the playing state.
    pub fn with_start_playing(mut self, playing: bool) -> Self {
        self.start_playing = playing;
        self
    }

    /// Mount this registry index at start.
    pub fn with_initial_experiment(mut self, index: usize) -> Self {
        self.initial_experiment = index;
        self
    }

    /// Set the headless runner's step and duration.
    pub fn with_headless_run(mut self, frame_step_ms: u64, run_seconds: f32) -> Self {
        self.frame_step_ms = frame_step_ms;
        self.run_seconds = run_seconds;
        self
    }

    /// Check that every value is usable with the standard registry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_settings()?;
        if self.initial_experiment >= EXPERIMENT_COUNT {
            return Err(ConfigError::Invalid(format!(
                "initial_experiment {} is out of range (0..{})",
                self.initial_experiment, EXPERIMENT_COUNT
            )));
        }
        Ok(())
    }

    /// Check everything except `initial_experiment`, whose range depends on
    /// the registry it is mounted from.
    pub fn validate_settings(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0)
            || !(self.canvas_height.is_finite() && self.canvas_height > 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.frame_step_ms == 0 {
            return Err(ConfigError::Invalid("frame_step_ms must be at least 1".into()));
        }
        if !(self.run_seconds.is_finite() && self.run_seconds >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "run_seconds must be non-negative, got {}",
                self.run_seconds
            )));
        }
        Ok(())
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a JSON config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LabConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LabConfig::from_json(r#"{ "canvas_width": 1024, "start_playing": true }"#)
            .expect("valid config");
        assert_eq!(config.canvas_width, 1024.0);
        assert_eq!(config.canvas_height, 500.0);
        assert!(config.start_playing);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            LabConfig::from_json(r#"{ "initial_experiment": 6 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            LabConfig::from_json(r#"{ "canvas_height": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(LabConfig::from_json("not json"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("canvas-lab-config-{}.json", std::process::id()));
        let config = LabConfig::new()
            .with_canvas_size(640.0, 480.0)
            .with_initial_experiment(3)
            .with_headless_run(10, 1.5);
        config.save(&path).expect("save");

        let loaded = LabConfig::load(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            LabConfig::load("/definitely/not/here/lab.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
