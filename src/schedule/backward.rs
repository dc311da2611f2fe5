// src/schedule/backward.rs

//! Backward pass: latest start / latest finish.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::graph::TaskGraph;
use crate::schedule::forward::ForwardPass;
use crate::types::NodeId;

/// Latest times of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateTimes {
    pub ls: f64,
    pub lf: f64,
}

/// Result of [`backward_pass`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackwardPass {
    pub times: HashMap<NodeId, LateTimes>,
    /// Reverse topological order in which nodes were resolved, End first.
    pub order: Vec<NodeId>,
}

impl BackwardPass {
    pub fn get(&self, id: &str) -> Option<LateTimes> {
        self.times.get(id).copied()
    }
}

/// Compute LS/LF for every forward-scheduled node that can reach End.
///
/// `LS(End) = LF(End) = EF(End)`. Working backward, a node is only resolved
/// once every successor that leads to End is resolved, and then takes the
/// tightest constraint: `LF(n) = min LS(s)`, `LS(n) = LF(n) - duration(n)`.
/// Start is pinned to `LS = LF = 0`.
///
/// Returns an empty result if End was not reached by the forward pass.
pub fn backward_pass(graph: &TaskGraph, forward: &ForwardPass) -> BackwardPass {
    let end = graph.end_id();
    let start = graph.start_id();
    let mut result = BackwardPass::default();

    let Some(project_end) = forward.get(end).map(|t| t.ef) else {
        debug!("backward pass: End not scheduled by forward pass; nothing to do");
        return result;
    };

    let candidates = reaching(graph, end, forward);

    let mut out_degree: HashMap<&str, usize> = candidates
        .iter()
        .map(|&id| {
            let degree = graph
                .nodes_outgoing_from(id)
                .into_iter()
                .filter(|s| candidates.contains(s))
                .count();
            (id, degree)
        })
        .collect();

    let mut queue: VecDeque<&str> = VecDeque::from([end]);

    while let Some(id) = queue.pop_front() {
        let times = if id == end {
            LateTimes {
                ls: project_end,
                lf: project_end,
            }
        } else {
            let duration = graph.node(id).map(|n| n.effective_duration()).unwrap_or(0.0);
            let lf = graph
                .nodes_outgoing_from(id)
                .into_iter()
                .filter_map(|s| result.times.get(s))
                .map(|t| t.ls)
                .fold(f64::INFINITY, f64::min);
            LateTimes {
                ls: lf - duration,
                lf,
            }
        };

        debug!(node = %id, ls = times.ls, lf = times.lf, "backward pass: resolved");
        result.times.insert(id.to_string(), times);
        result.order.push(id.to_string());

        for pred in graph.nodes_incoming_to(id) {
            if let Some(degree) = out_degree.get_mut(pred) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(pred);
                }
            }
        }
    }

    if let Some(times) = result.times.get_mut(start) {
        if times.ls != 0.0 || times.lf != 0.0 {
            debug!(ls = times.ls, lf = times.lf, "backward pass: pinning Start to 0");
        }
        *times = LateTimes { ls: 0.0, lf: 0.0 };
    }

    result
}

/// Forward-scheduled nodes from which `end` is reachable, `end` included.
fn reaching<'g>(graph: &'g TaskGraph, end: &'g str, forward: &ForwardPass) -> HashSet<&'g str> {
    let mut visited: HashSet<&'g str> = HashSet::new();
    let mut stack: Vec<&'g str> = vec![end];

    while let Some(id) = stack.pop() {
        if !forward.is_scheduled(id) || !visited.insert(id) {
            continue;
        }
        stack.extend(graph.nodes_incoming_to(id));
    }

    visited
}
