//! Tunable parameters for temperament construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exact::MAX_COMPONENTS;
use crate::temper::optimize::{DEFAULT_ITERATIONS, DEFAULT_STEP_SIZE};

/// Optimizer and representation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperConfig {
    /// Sweeps of the least-angle optimizer.
    /// Default: 1000.
    pub iterations: usize,

    /// Gradient step pulling constraints toward just.
    /// Default: 0.5. Larger steps can oscillate on constraints with many
    /// prime factors.
    pub step_size: f64,

    /// Vector length of every monzo in a computation.
    /// Default: 7 (the 17-limit).
    pub number_of_components: usize,
}

impl Default for TemperConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            step_size: DEFAULT_STEP_SIZE,
            number_of_components: 7,
        }
    }
}

impl TemperConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations < 1 {
            return Err(ConfigError::Invalid(format!(
                "iterations must be >= 1, got {}",
                self.iterations
            )));
        }
        if !(self.step_size > 0.0 && self.step_size <= 2.0) {
            return Err(ConfigError::Invalid(format!(
                "step_size must be in (0, 2], got {}",
                self.step_size
            )));
        }
        if !(1..=MAX_COMPONENTS).contains(&self.number_of_components) {
            return Err(ConfigError::Invalid(format!(
                "number_of_components must be in [1, {}], got {}",
                MAX_COMPONENTS, self.number_of_components
            )));
        }
        Ok(())
    }

    /// Load from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::Invalid(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),
}
