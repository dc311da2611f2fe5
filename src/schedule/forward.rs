// src/schedule/forward.rs

//! Forward pass: earliest start / earliest finish.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::graph::TaskGraph;
use crate::types::NodeId;

/// Earliest times of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyTimes {
    pub es: f64,
    pub ef: f64,
}

/// Result of [`forward_pass`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForwardPass {
    /// ES/EF of every node that was scheduled.
    pub times: HashMap<NodeId, EarlyTimes>,
    /// Topological order in which nodes were resolved, Start first.
    pub order: Vec<NodeId>,
}

impl ForwardPass {
    pub fn get(&self, id: &str) -> Option<EarlyTimes> {
        self.times.get(id).copied()
    }

    pub fn is_scheduled(&self, id: &str) -> bool {
        self.times.contains_key(id)
    }
}

/// Compute ES/EF for every node reachable from Start.
///
/// Nodes are resolved with Kahn's algorithm restricted to the part of the
/// graph reachable from Start: a node is only resolved once all of its
/// reachable predecessors are, so `ES(n) = max EF(p)` over its predecessors.
///
/// Nodes that are unreachable, or that sit on or behind a cycle, are left out
/// of the result.
pub fn forward_pass(graph: &TaskGraph) -> ForwardPass {
    let start = graph.start_id();
    let reachable = reachable_from(graph, start);

    let mut in_degree: HashMap<&str, usize> = reachable
        .iter()
        .map(|&id| {
            let degree = graph
                .nodes_incoming_to(id)
                .into_iter()
                .filter(|p| reachable.contains(p))
                .count();
            (id, degree)
        })
        .collect();

    let mut result = ForwardPass::default();
    let mut queue: VecDeque<&str> = VecDeque::new();
    if reachable.contains(start) {
        queue.push_back(start);
    }

    while let Some(id) = queue.pop_front() {
        let duration = graph.node(id).map(|n| n.effective_duration()).unwrap_or(0.0);
        let es = graph
            .nodes_incoming_to(id)
            .into_iter()
            .filter_map(|p| result.times.get(p))
            .map(|t| t.ef)
            .fold(0.0, f64::max);
        let ef = es + duration;

        debug!(node = %id, es, ef, "forward pass: resolved");
        result.times.insert(id.to_string(), EarlyTimes { es, ef });
        result.order.push(id.to_string());

        for succ in graph.nodes_outgoing_from(id) {
            if let Some(degree) = in_degree.get_mut(succ) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }
    }

    if result.order.len() < reachable.len() {
        let mut stuck: Vec<&str> = reachable
            .iter()
            .copied()
            .filter(|id| !result.times.contains_key(*id))
            .collect();
        stuck.sort_unstable();
        warn!(?stuck, "forward pass: cycle detected; nodes left unscheduled");
    }

    result
}

/// Every node reachable from `root` along outgoing edges, `root` included.
pub(crate) fn reachable_from<'g>(graph: &'g TaskGraph, root: &str) -> HashSet<&'g str> {
    let mut visited: HashSet<&'g str> = HashSet::new();
    let Some(root) = graph.node(root) else {
        return visited;
    };
    let mut stack: Vec<&'g str> = vec![root.id.as_str()];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        stack.extend(graph.nodes_outgoing_from(id));
    }

    visited
}
