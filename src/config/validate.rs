// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PertError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PertError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Check the semantic constraints serde cannot express.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_schedule(cfg)?;
    validate_sentinels(cfg)?;
    Ok(())
}

fn validate_schedule(cfg: &RawConfigFile) -> Result<()> {
    let tolerance = cfg.schedule.slack_tolerance;
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(PertError::ConfigError(format!(
            "[schedule].slack_tolerance must be a finite number >= 0 (got {tolerance})"
        )));
    }

    if cfg.schedule.max_critical_paths == 0 {
        return Err(PertError::ConfigError(
            "[schedule].max_critical_paths must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_sentinels(cfg: &RawConfigFile) -> Result<()> {
    let sentinels = &cfg.sentinels;
    for (name, pos) in [
        ("start_position", sentinels.start_position),
        ("end_position", sentinels.end_position),
    ] {
        if !pos.is_finite() {
            return Err(PertError::ConfigError(format!(
                "[sentinels].{name} must have finite coordinates (got x={}, y={})",
                pos.x, pos.y
            )));
        }
    }
    Ok(())
}
