// src/config/model.rs

use serde::Deserialize;

use crate::graph::{DEFAULT_END_POSITION, DEFAULT_START_POSITION, Position};
use crate::schedule::{DEFAULT_MAX_CRITICAL_PATHS, DEFAULT_SLACK_TOLERANCE};
use crate::types::{CyclePolicy, ReportFormat};

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [schedule]
/// slack_tolerance = 1e-9
/// max_critical_paths = 1000
///
/// [connections]
/// cycle_policy = "reject"
///
/// [sentinels]
/// start_position = { x = 100.0, y = 300.0 }
/// end_position = { x = 900.0, y = 300.0 }
///
/// [report]
/// format = "text"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub schedule: ScheduleSection,

    #[serde(default)]
    pub connections: ConnectionSection,

    #[serde(default)]
    pub sentinels: SentinelSection,

    #[serde(default)]
    pub report: ReportSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub schedule: ScheduleSection,
    pub connections: ConnectionSection,
    pub sentinels: SentinelSection,
    pub report: ReportSection,
}

impl ConfigFile {
    /// Wrap sections that are already known to be valid.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            schedule: raw.schedule,
            connections: raw.connections,
            sentinels: raw.sentinels,
            report: raw.report,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[schedule]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSection {
    /// Largest `|ES - LS|` / `|EF - LF|` still treated as zero slack,
    /// multiplied by `max(1, |EF(End)|)`.
    #[serde(default = "default_slack_tolerance")]
    pub slack_tolerance: f64,

    /// Stop enumerating critical paths after this many.
    #[serde(default = "default_max_critical_paths")]
    pub max_critical_paths: usize,
}

fn default_slack_tolerance() -> f64 {
    DEFAULT_SLACK_TOLERANCE
}

fn default_max_critical_paths() -> usize {
    DEFAULT_MAX_CRITICAL_PATHS
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            slack_tolerance: default_slack_tolerance(),
            max_critical_paths: default_max_critical_paths(),
        }
    }
}

/// `[connections]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConnectionSection {
    /// `"reject"` (default) or `"allow"`.
    #[serde(default)]
    pub cycle_policy: CyclePolicy,
}

/// `[sentinels]` section: where Start/End are placed when a diagram is
/// created or imported.
#[derive(Debug, Clone, Deserialize)]
pub struct SentinelSection {
    #[serde(default = "default_start_position")]
    pub start_position: Position,

    #[serde(default = "default_end_position")]
    pub end_position: Position,
}

fn default_start_position() -> Position {
    DEFAULT_START_POSITION
}

fn default_end_position() -> Position {
    DEFAULT_END_POSITION
}

impl Default for SentinelSection {
    fn default() -> Self {
        Self {
            start_position: default_start_position(),
            end_position: default_end_position(),
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReportSection {
    /// `"text"` (default) or `"json"`.
    #[serde(default)]
    pub format: ReportFormat,
}
