// src/graph/connections.rs

//! Validated mutations of a [`TaskGraph`].

use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::errors::Rejection;
use crate::graph::node::{Node, NodeKind};
use crate::graph::task_graph::{Edge, TaskGraph};
use crate::types::{CyclePolicy, EdgeId};

/// Applies connection and deletion requests against a [`TaskGraph`],
/// refusing anything that would break the graph invariants:
///
/// - Start has no predecessors, End has no successors
/// - no self-loops
/// - at most one edge between any two nodes, whatever the direction
/// - (with [`CyclePolicy::Reject`]) no cycles
///
/// Every operation either fully applies or returns a [`Rejection`] and leaves
/// the graph untouched.
pub struct ConnectionManager<'a> {
    graph: &'a mut TaskGraph,
    cycle_policy: CyclePolicy,
}

impl<'a> ConnectionManager<'a> {
    pub fn new(graph: &'a mut TaskGraph, cycle_policy: CyclePolicy) -> Self {
        Self {
            graph,
            cycle_policy,
        }
    }

    /// Connect `source -> target` ("source must complete before target").
    pub fn create_connection(&mut self, source: &str, target: &str) -> Result<EdgeId, Rejection> {
        if let Err(rejection) = check_connection(self.graph, source, target, self.cycle_policy) {
            warn!(%source, %target, %rejection, "connection rejected");
            return Err(rejection);
        }
        let id = self.graph.add_edge(source, target);
        debug!(edge = %id, %source, %target, "connection created");
        Ok(id)
    }

    /// Like [`create_connection`](Self::create_connection) but keeps a
    /// caller-provided edge id (used when importing stored edges).
    pub fn restore_connection(&mut self, edge: Edge) -> Result<EdgeId, Rejection> {
        check_connection(self.graph, &edge.source, &edge.target, self.cycle_policy)?;
        if self.graph.edge(&edge.id).is_some() {
            // Id clash with a different pair; keep the relationship, not the id.
            return Ok(self.graph.add_edge(&edge.source, &edge.target));
        }
        let id = edge.id.clone();
        self.graph.insert_edge(edge);
        Ok(id)
    }

    /// Remove the edge between `a` and `b`, whichever direction it runs.
    pub fn delete_connection(&mut self, a: &str, b: &str) -> Result<Edge, Rejection> {
        let id = match self.graph.edge_between(a, b) {
            Some(edge) => edge.id.clone(),
            None => return Err(Rejection::NoSuchConnection(a.to_string(), b.to_string())),
        };
        let edge = self
            .graph
            .remove_edge(&id)
            .ok_or_else(|| Rejection::NoSuchConnection(a.to_string(), b.to_string()))?;
        debug!(edge = %edge.id, "connection deleted");
        Ok(edge)
    }

    /// Remove a task node and every edge touching it. Sentinels are refused.
    pub fn delete_node(&mut self, id: &str) -> Result<Node, Rejection> {
        match self.graph.node(id) {
            None => return Err(Rejection::MissingNode(id.to_string())),
            Some(node) if node.is_sentinel() => {
                warn!(node = %id, "refusing to delete sentinel node");
                return Err(Rejection::SentinelNode(id.to_string()));
            }
            Some(_) => {}
        }
        self.graph
            .remove_node(id)
            .ok_or_else(|| Rejection::MissingNode(id.to_string()))
    }

    /// Add a task node. Sentinel kinds, taken ids and bad durations are refused.
    pub fn add_task(&mut self, node: Node) -> Result<(), Rejection> {
        if node.kind != NodeKind::Task {
            return Err(Rejection::SentinelNode(node.id));
        }
        validate_duration(&node.id, node.duration)?;
        if self.graph.contains_node(&node.id) {
            return Err(Rejection::DuplicateNode(node.id));
        }
        self.graph.add_node(node);
        Ok(())
    }

    /// Change a task's duration.
    pub fn set_duration(&mut self, id: &str, duration: f64) -> Result<(), Rejection> {
        validate_duration(id, duration)?;
        let node = self
            .graph
            .node_mut(id)
            .ok_or_else(|| Rejection::MissingNode(id.to_string()))?;
        if node.is_sentinel() {
            return Err(Rejection::SentinelNode(id.to_string()));
        }
        node.duration = duration;
        self.graph.invalidate_schedules();
        Ok(())
    }
}

/// Check whether `source -> target` may be added, without touching the graph.
pub fn check_connection(
    graph: &TaskGraph,
    source: &str,
    target: &str,
    cycle_policy: CyclePolicy,
) -> Result<(), Rejection> {
    for id in [source, target] {
        if !graph.contains_node(id) {
            return Err(Rejection::MissingNode(id.to_string()));
        }
    }
    if target == graph.start_id() {
        return Err(Rejection::TargetIsStart);
    }
    if source == graph.end_id() {
        return Err(Rejection::SourceIsEnd);
    }
    if source == target {
        return Err(Rejection::SelfLoop(source.to_string()));
    }
    if graph.edge_between(source, target).is_some() {
        return Err(Rejection::AlreadyConnected(
            source.to_string(),
            target.to_string(),
        ));
    }
    if cycle_policy == CyclePolicy::Reject && would_create_cycle(graph, source, target) {
        return Err(Rejection::WouldCreateCycle {
            from: source.to_string(),
            to: target.to_string(),
        });
    }
    Ok(())
}

/// A new edge `source -> target` closes a cycle iff `source` is already
/// reachable from `target`.
fn would_create_cycle(graph: &TaskGraph, source: &str, target: &str) -> bool {
    let mut digraph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for node in graph.nodes() {
        digraph.add_node(node.id.as_str());
    }
    for edge in graph.edges() {
        digraph.add_edge(edge.source.as_str(), edge.target.as_str(), ());
    }
    has_path_connecting(&digraph, target, source, None)
}

fn validate_duration(id: &str, duration: f64) -> Result<(), Rejection> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(())
    } else {
        Err(Rejection::InvalidDuration {
            id: id.to_string(),
            duration,
        })
    }
}
