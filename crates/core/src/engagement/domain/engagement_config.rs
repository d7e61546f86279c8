use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_FOCUS_FRACTION, DEFAULT_POLL_INTERVAL_MS,
    DESCRIPTOR_MATCH_THRESHOLD,
};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("focus fraction must be between 0.0 and 1.0, got {0}")]
    FocusFraction(f64),
    #[error("debounce delay must be positive")]
    ZeroDebounce,
    #[error("poll interval must be positive")]
    ZeroPollInterval,
    #[error("match threshold must be positive, got {0}")]
    MatchThreshold(f64),
}

/// Tunables for engagement evaluation and face matching.
///
/// Missing fields deserialize to their defaults, so a settings file may
/// override any subset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    pub focus_fraction: f64,
    pub debounce_ms: u64,
    pub poll_interval_ms: u64,
    pub match_threshold: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            focus_fraction: DEFAULT_FOCUS_FRACTION,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            match_threshold: DESCRIPTOR_MATCH_THRESHOLD,
        }
    }
}

impl EngagementConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.focus_fraction) {
            return Err(ConfigError::FocusFraction(self.focus_fraction));
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.match_threshold.is_nan() || self.match_threshold <= 0.0 {
            return Err(ConfigError::MatchThreshold(self.match_threshold));
        }
        Ok(())
    }
}
