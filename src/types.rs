// src/types.rs

//! Small shared types used across the graph, scheduling and IO layers.

use std::str::FromStr;

use serde::Deserialize;

/// Canonical node identifier type.
pub type NodeId = String;

/// Canonical edge identifier type.
pub type EdgeId = String;

/// Fixed id of the Start sentinel node.
pub const START_NODE_ID: &str = "start";

/// Fixed id of the End sentinel node.
pub const END_NODE_ID: &str = "end";

/// What `create_connection` does with an edge that would close a cycle.
///
/// - `Reject` (default): the connection is refused with
///   [`Rejection::WouldCreateCycle`](crate::errors::Rejection::WouldCreateCycle).
/// - `Allow`: the edge is accepted and the nodes on (or behind) the cycle are
///   left unscheduled by the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    #[default]
    Reject,
    Allow,
}

impl FromStr for CyclePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(CyclePolicy::Reject),
            "allow" => Ok(CyclePolicy::Allow),
            other => Err(format!(
                "invalid cycle_policy: {other} (expected \"reject\" or \"allow\")"
            )),
        }
    }
}

/// Output format of the CLI report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!(
                "invalid report format: {other} (expected \"text\" or \"json\")"
            )),
        }
    }
}
