// src/schedule/mod.rs

//! PERT/CPM scheduling over a [`TaskGraph`].
//!
//! - [`forward`] computes earliest start / finish (ES, EF).
//! - [`backward`] computes latest start / finish (LS, LF) from the forward
//!   result for End.
//! - [`critical`] enumerates the zero-slack Start → End paths.
//!
//! Recomputation is always whole-graph: [`run_schedule`] clears every stored
//! schedule and writes fresh ones, so running it twice on an unchanged graph
//! gives identical results.

pub mod backward;
pub mod critical;
pub mod forward;

use tracing::info;

use crate::config::ConfigFile;
use crate::graph::{Schedule, TaskGraph};
use crate::types::NodeId;

pub use backward::{BackwardPass, LateTimes, backward_pass};
pub use critical::{CriticalPathFinder, CriticalPaths};
pub use forward::{EarlyTimes, ForwardPass, forward_pass};

/// Default tolerance when comparing ES/LS and EF/LF, relative to the
/// project length (see [`scaled_tolerance`]).
pub const DEFAULT_SLACK_TOLERANCE: f64 = 1e-9;

/// Default cap on enumerated critical paths.
pub const DEFAULT_MAX_CRITICAL_PATHS: usize = 1000;

/// Tuning knobs for slack comparison and path enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleOptions {
    pub slack_tolerance: f64,
    pub max_critical_paths: usize,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            slack_tolerance: DEFAULT_SLACK_TOLERANCE,
            max_critical_paths: DEFAULT_MAX_CRITICAL_PATHS,
        }
    }
}

impl ScheduleOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            slack_tolerance: cfg.schedule.slack_tolerance,
            max_critical_paths: cfg.schedule.max_critical_paths,
        }
    }
}

/// Outcome of [`run_schedule`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSummary {
    /// `EF(End)`, or `None` if End was not reachable from Start.
    pub project_duration: Option<f64>,
    /// Nodes that received ES/EF.
    pub scheduled: usize,
    /// Nodes left without any schedule (unreachable or cyclic), sorted.
    pub unscheduled: Vec<NodeId>,
}

/// Absolute slack tolerance for `graph`: `tolerance * max(1, |EF(End)|)`.
/// An unscheduled graph gets `tolerance` unchanged.
pub fn scaled_tolerance(tolerance: f64, graph: &TaskGraph) -> f64 {
    let span = graph
        .node(graph.end_id())
        .and_then(|n| n.schedule)
        .map_or(0.0, |s| s.ef.abs());
    tolerance * span.max(1.0)
}

/// Run the forward then backward pass and store the result on every node.
pub fn run_schedule(graph: &mut TaskGraph) -> ScheduleSummary {
    graph.invalidate_schedules();

    let forward = forward_pass(graph);
    let backward = backward_pass(graph, &forward);

    let mut unscheduled = Vec::new();
    let ids: Vec<NodeId> = graph.nodes().map(|n| n.id.clone()).collect();
    for id in ids {
        let Some(early) = forward.get(&id) else {
            unscheduled.push(id);
            continue;
        };
        let late = backward.get(&id);
        if let Some(node) = graph.node_mut(&id) {
            node.schedule = Some(Schedule {
                es: early.es,
                ef: early.ef,
                ls: late.map(|t| t.ls),
                lf: late.map(|t| t.lf),
            });
        }
    }

    let summary = ScheduleSummary {
        project_duration: forward.get(graph.end_id()).map(|t| t.ef),
        scheduled: forward.times.len(),
        unscheduled,
    };

    info!(
        project_duration = ?summary.project_duration,
        scheduled = summary.scheduled,
        unscheduled = summary.unscheduled.len(),
        "schedule computed"
    );

    summary
}
