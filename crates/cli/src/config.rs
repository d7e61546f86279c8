//! Settings layering: defaults, then a JSON settings file, then CLI flags.
//!
//! The settings file is `--config <path>` when given, otherwise
//! `<config dir>/GazeGuard/settings.json` if it exists.

use std::fs;
use std::path::{Path, PathBuf};

use gazeguard_core::engagement::domain::engagement_config::EngagementConfig;

/// Flag values that override the settings file when present.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub focus_fraction: Option<f64>,
    pub debounce_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub match_threshold: Option<f64>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("GazeGuard").join("settings.json"))
}

pub fn load(
    explicit: Option<&Path>,
    overrides: &Overrides,
) -> Result<EngagementConfig, Box<dyn std::error::Error>> {
    let mut config = match explicit {
        Some(path) => read_settings(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => read_settings(&path)?,
            None => EngagementConfig::default(),
        },
    };
    apply(&mut config, overrides);
    config.validate()?;
    Ok(config)
}

fn read_settings(path: &Path) -> Result<EngagementConfig, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read settings {}: {e}", path.display()))?;
    let config = serde_json::from_str(&json)
        .map_err(|e| format!("Invalid settings {}: {e}", path.display()))?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(config)
}

fn apply(config: &mut EngagementConfig, overrides: &Overrides) {
    if let Some(v) = overrides.focus_fraction {
        config.focus_fraction = v;
    }
    if let Some(v) = overrides.debounce_ms {
        config.debounce_ms = v;
    }
    if let Some(v) = overrides.poll_interval_ms {
        config.poll_interval_ms = v;
    }
    if let Some(v) = overrides.match_threshold {
        config.match_threshold = v;
    }
}
