// src/diagram.rs

//! The diagram facade: the operations the surrounding application calls.
//!
//! A [`Diagram`] owns one [`TaskGraph`] for a scheduling session and tracks
//! where that graph is in its lifecycle:
//!
//! ```text
//! Unscheduled --run_schedule--> Scheduled --find_critical_paths--> CriticalPathsComputed
//!      ^                                                                   |
//!      +--------------------- any successful mutation ---------------------+
//! ```
//!
//! Mutations go through [`ConnectionManager`], so a rejected request leaves
//! both the graph and the state untouched.

use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::Rejection;
use crate::graph::{
    ConnectionManager, DEFAULT_END_POSITION, DEFAULT_START_POSITION, Edge, Node, Position,
    TaskGraph,
};
use crate::schedule::{CriticalPathFinder, CriticalPaths, ScheduleOptions, ScheduleSummary};
use crate::types::{CyclePolicy, EdgeId};

/// Lifecycle of the computed data of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramState {
    /// No valid schedule; ES/EF/LS/LF must not be read.
    Unscheduled,
    /// Forward and backward passes ran on the current graph.
    Scheduled,
    /// Critical paths were enumerated on the current schedule.
    CriticalPathsComputed,
}

/// Options shared by diagram construction, mutation and scheduling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramOptions {
    pub cycle_policy: CyclePolicy,
    pub schedule: ScheduleOptions,
    pub start_position: Position,
    pub end_position: Position,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            cycle_policy: CyclePolicy::default(),
            schedule: ScheduleOptions::default(),
            start_position: DEFAULT_START_POSITION,
            end_position: DEFAULT_END_POSITION,
        }
    }
}

impl DiagramOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            cycle_policy: cfg.connections.cycle_policy,
            schedule: ScheduleOptions::from_config(cfg),
            start_position: cfg.sentinels.start_position,
            end_position: cfg.sentinels.end_position,
        }
    }

    /// An empty graph with the sentinels at the configured positions.
    pub fn empty_graph(&self) -> TaskGraph {
        TaskGraph::with_sentinels(self.start_position, self.end_position)
    }
}

#[derive(Debug, Clone)]
pub struct Diagram {
    graph: TaskGraph,
    options: DiagramOptions,
    state: DiagramState,
    critical: Option<CriticalPaths>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramOptions::default())
    }
}

impl Diagram {
    /// A diagram holding only Start and End.
    pub fn new(options: DiagramOptions) -> Self {
        Self::from_graph(options.empty_graph(), options)
    }

    /// Wrap an existing graph (e.g. from an import). Any schedule it carries
    /// is discarded.
    pub fn from_graph(mut graph: TaskGraph, options: DiagramOptions) -> Self {
        graph.invalidate_schedules();
        Self {
            graph,
            options,
            state: DiagramState::Unscheduled,
            critical: None,
        }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::new(DiagramOptions::from_config(cfg))
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TaskGraph {
        self.graph
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    pub fn state(&self) -> DiagramState {
        self.state
    }

    /// Last computed critical paths, if the current state has them.
    pub fn critical_paths(&self) -> Option<&CriticalPaths> {
        self.critical.as_ref()
    }

    pub fn add_task(&mut self, node: Node) -> Result<(), Rejection> {
        self.manager().add_task(node)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_duration(&mut self, id: &str, duration: f64) -> Result<(), Rejection> {
        self.manager().set_duration(id, duration)?;
        self.invalidate();
        Ok(())
    }

    pub fn create_connection(&mut self, source: &str, target: &str) -> Result<EdgeId, Rejection> {
        let id = self.manager().create_connection(source, target)?;
        self.invalidate();
        Ok(id)
    }

    pub fn delete_connection(&mut self, a: &str, b: &str) -> Result<Edge, Rejection> {
        let edge = self.manager().delete_connection(a, b)?;
        self.invalidate();
        Ok(edge)
    }

    pub fn delete_node(&mut self, id: &str) -> Result<Node, Rejection> {
        let node = self.manager().delete_node(id)?;
        self.invalidate();
        Ok(node)
    }

    /// Forward pass then backward pass over the whole graph.
    pub fn run_schedule(&mut self) -> ScheduleSummary {
        let summary = crate::schedule::run_schedule(&mut self.graph);
        self.critical = None;
        self.state = DiagramState::Scheduled;
        summary
    }

    /// Enumerate critical paths on the stored schedule.
    ///
    /// On an unscheduled diagram this returns an empty result and the state
    /// stays `Unscheduled`.
    pub fn find_critical_paths(&mut self) -> CriticalPaths {
        let paths = CriticalPathFinder::new(&self.options.schedule).find(&self.graph);
        if self.state != DiagramState::Unscheduled {
            self.state = DiagramState::CriticalPathsComputed;
            self.critical = Some(paths.clone());
        }
        paths
    }

    fn manager(&mut self) -> ConnectionManager<'_> {
        ConnectionManager::new(&mut self.graph, self.options.cycle_policy)
    }

    fn invalidate(&mut self) {
        if self.state != DiagramState::Unscheduled {
            debug!(previous = ?self.state, "diagram mutated; schedule invalidated");
        }
        self.graph.invalidate_schedules();
        self.state = DiagramState::Unscheduled;
        self.critical = None;
    }
}
