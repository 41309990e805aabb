//! Error types for Canvas Lab.
//!
//! The engine itself has no I/O failure modes. The only rejections it reports
//! are out-of-range selections and configuration problems. The headless runner
//! can additionally fail to write its report stream. Numeric edge cases are
//! guarded where they occur and never surface as errors.

use std::fmt;

/// Errors that can occur while loading or validating a [`LabConfig`](crate::LabConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    Io(std::io::Error),
    /// The file was not valid JSON for a `LabConfig`.
    Parse(serde_json::Error),
    /// The config parsed but holds an unusable value.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors reported by the [`SimulationController`](crate::SimulationController).
#[derive(Debug)]
pub enum LabError {
    /// An experiment index outside the registry was selected.
    ///
    /// The selection is rejected and the controller state is left untouched.
    InvalidIndex { index: usize, len: usize },
    /// Configuration could not be loaded or validated.
    Config(ConfigError),
    /// The headless runner could not write a status report.
    Output(std::io::Error),
}

impl fmt::Display for LabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabError::InvalidIndex { index, len } => write!(
                f,
                "Experiment index {} is out of range (registry holds {} experiments)",
                index, len
            ),
            LabError::Config(e) => write!(f, "Configuration error: {}", e),
            LabError::Output(e) => write!(f, "Failed to write report: {}", e),
        }
    }
}

impl std::error::Error for LabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LabError::Config(e) => Some(e),
            LabError::Output(e) => Some(e),
            LabError::InvalidIndex { .. } => None,
        }
    }
}

impl From<ConfigError> for LabError {
    fn from(e: ConfigError) -> Self {
        LabError::Config(e)
    }
}

impl From<std::io::Error> for LabError {
    fn from(e: std::io::Error) -> Self {
        LabError::Output(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_index_message() {
        let err = LabError::InvalidIndex { index: 9, len: 6 };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains('6'));
    }

    #[test]
    fn test_config_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LabError = ConfigError::from(io).into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
