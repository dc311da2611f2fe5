// src/schedule/critical.rs

//! Critical path enumeration over a scheduled graph.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::graph::TaskGraph;
use crate::schedule::{ScheduleOptions, scaled_tolerance};
use crate::types::{EdgeId, NodeId};

/// Every Start → End path made only of critical nodes, plus the edges they use.
///
/// Consecutive nodes on a path must also be joined without a gap
/// (`ES(next) == EF(prev)`), so each path's total duration is `EF(End)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPaths {
    pub paths: Vec<Vec<NodeId>>,
    /// Edges lying on at least one critical path, sorted by id.
    pub critical_edge_ids: Vec<EdgeId>,
    /// Set when enumeration stopped at `max_critical_paths`.
    pub truncated: bool,
}

impl CriticalPaths {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Enumerates critical paths with an explicit depth-first stack.
#[derive(Debug, Clone, Copy)]
pub struct CriticalPathFinder {
    tolerance: f64,
    max_paths: usize,
}

/// One level of the DFS: a node on the current path and the index of the
/// next successor to try.
struct Frame<'g> {
    node: &'g str,
    successors: Vec<&'g str>,
    next: usize,
}

impl CriticalPathFinder {
    pub fn new(options: &ScheduleOptions) -> Self {
        Self {
            tolerance: options.slack_tolerance,
            max_paths: options.max_critical_paths,
        }
    }

    /// Find all critical paths of `graph`, using the schedules stored on its
    /// nodes. An unscheduled graph yields an empty result.
    ///
    /// The configured tolerance is scaled by the project length first.
    pub fn find(&self, graph: &TaskGraph) -> CriticalPaths {
        let scaled = Self {
            tolerance: scaled_tolerance(self.tolerance, graph),
            ..*self
        };
        scaled.search(graph)
    }

    fn search(&self, graph: &TaskGraph) -> CriticalPaths {
        let mut result = CriticalPaths::default();
        let start = graph.start_id();
        let end = graph.end_id();

        if !self.is_critical(graph, start) || !self.is_critical(graph, end) {
            debug!("critical paths: Start or End not critical (unscheduled?)");
            return result;
        }

        let mut edges: BTreeSet<EdgeId> = BTreeSet::new();
        let mut on_path: HashSet<&str> = HashSet::from([start]);
        let mut stack: Vec<Frame<'_>> = vec![self.frame(graph, start)];

        'search: while let Some(frame) = stack.last_mut() {
            let Some(&succ) = frame.successors.get(frame.next) else {
                if let Some(done) = stack.pop() {
                    on_path.remove(done.node);
                }
                continue;
            };
            frame.next += 1;

            if succ == end {
                if result.paths.len() >= self.max_paths {
                    result.truncated = true;
                    break 'search;
                }
                let mut path: Vec<&str> = stack.iter().map(|f| f.node).collect();
                path.push(end);
                for pair in path.windows(2) {
                    if let Some(edge) = graph.directed_edge(pair[0], pair[1]) {
                        edges.insert(edge.id.clone());
                    }
                }
                debug!(?path, "critical path found");
                result
                    .paths
                    .push(path.into_iter().map(str::to_string).collect());
            } else if !on_path.contains(succ) {
                on_path.insert(succ);
                stack.push(self.frame(graph, succ));
            }
        }

        if result.truncated {
            warn!(
                limit = self.max_paths,
                "critical path enumeration truncated"
            );
        }

        result.critical_edge_ids = edges.into_iter().collect();
        result
    }

    fn frame<'g>(&self, graph: &'g TaskGraph, node: &'g str) -> Frame<'g> {
        let finish = graph.node(node).and_then(|n| n.schedule).map(|s| s.ef);
        let successors = graph
            .nodes_outgoing_from(node)
            .into_iter()
            .filter(|s| self.is_critical(graph, s) && self.is_tight(graph, finish, s))
            .collect();
        Frame {
            node,
            successors,
            next: 0,
        }
    }

    /// The successor starts exactly when its predecessor finishes. A
    /// shortcut edge between two critical nodes that skips part of the
    /// longest chain is not tight.
    fn is_tight(&self, graph: &TaskGraph, finish: Option<f64>, succ: &str) -> bool {
        let start = graph.node(succ).and_then(|n| n.schedule).map(|s| s.es);
        match (finish, start) {
            (Some(ef), Some(es)) => (es - ef).abs() <= self.tolerance,
            _ => false,
        }
    }

    fn is_critical(&self, graph: &TaskGraph, id: &str) -> bool {
        graph
            .node(id)
            .is_some_and(|n| n.is_critical(self.tolerance))
    }
}
