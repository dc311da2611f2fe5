// src/graph/task_graph.rs

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::node::{Node, Position};
use crate::types::{EdgeId, END_NODE_ID, NodeId, START_NODE_ID};

/// Default canvas position of the Start sentinel.
pub const DEFAULT_START_POSITION: Position = Position { x: 100.0, y: 300.0 };

/// Default canvas position of the End sentinel.
pub const DEFAULT_END_POSITION: Position = Position { x: 900.0, y: 300.0 };

/// "`source` must complete before `target` starts."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether this edge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// In-memory task graph keyed by node id.
///
/// This is a plain container: mutation primitives here do **not** enforce the
/// connection rules. Go through
/// [`ConnectionManager`](crate::graph::ConnectionManager) (or
/// [`Diagram`](crate::diagram::Diagram)) to keep the graph well-formed.
///
/// Adjacency is indexed per node (`outgoing` / `incoming` edge ids) and kept
/// in step with `edges` by every primitive, so a node's dependency set is
/// always exactly the sources of its incoming edges.
///
/// Every structural mutation clears all computed schedules.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    incoming: HashMap<NodeId, Vec<EdgeId>>,
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskGraph {
    /// A graph holding only the Start and End sentinels at default positions.
    pub fn new() -> Self {
        Self::with_sentinels(DEFAULT_START_POSITION, DEFAULT_END_POSITION)
    }

    /// A graph holding only the Start and End sentinels.
    pub fn with_sentinels(start: Position, end: Position) -> Self {
        let mut graph = Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        };
        graph.add_node(Node::start(start));
        graph.add_node(Node::end(end));
        graph
    }

    pub fn start_id(&self) -> &str {
        START_NODE_ID
    }

    pub fn end_id(&self) -> &str {
        END_NODE_ID
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes, sentinels included, ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Task nodes only (no sentinels), ordered by id.
    pub fn tasks(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| !n.is_sentinel())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All edges, ordered by id.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge joining `a` and `b` in either direction, if any.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&Edge> {
        self.outgoing_edges(a)
            .chain(self.incoming_edges(a))
            .find(|e| e.connects(a, b))
    }

    /// The edge going exactly `source -> target`, if any.
    pub fn directed_edge(&self, source: &str, target: &str) -> Option<&Edge> {
        self.outgoing_edges(source).find(|e| e.target == target)
    }

    pub fn outgoing_edges(&self, id: &str) -> impl Iterator<Item = &Edge> {
        Self::resolve(&self.edges, self.outgoing.get(id))
    }

    pub fn incoming_edges(&self, id: &str) -> impl Iterator<Item = &Edge> {
        Self::resolve(&self.edges, self.incoming.get(id))
    }

    /// Direct successors of `id` (targets of its outgoing edges).
    pub fn nodes_outgoing_from(&self, id: &str) -> Vec<&str> {
        self.outgoing_edges(id).map(|e| e.target.as_str()).collect()
    }

    /// Direct predecessors of `id` (sources of its incoming edges).
    pub fn nodes_incoming_to(&self, id: &str) -> Vec<&str> {
        self.incoming_edges(id).map(|e| e.source.as_str()).collect()
    }

    /// The nodes `id` depends on, sorted.
    ///
    /// Derived from the incoming edges on every call; there is no separate
    /// dependency list to keep in sync.
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        let mut deps = self.nodes_incoming_to(id);
        deps.sort_unstable();
        deps
    }

    /// Whether any node carries a computed schedule.
    pub fn has_schedule(&self) -> bool {
        self.nodes.values().any(|n| n.schedule.is_some())
    }

    /// Insert a node. Returns `false` (and changes nothing) if the id is taken.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.invalidate_schedules();
        debug!(node = %node.id, kind = ?node.kind, "graph: node added");
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let node = self.nodes.remove(id)?;

        let touching: Vec<EdgeId> = self
            .outgoing
            .remove(id)
            .into_iter()
            .chain(self.incoming.remove(id))
            .flatten()
            .collect();
        for edge_id in touching {
            self.remove_edge(&edge_id);
        }

        self.invalidate_schedules();
        debug!(node = %id, "graph: node removed");
        Some(node)
    }

    /// Insert an edge with a generated id and return that id.
    pub fn add_edge(&mut self, source: &str, target: &str) -> EdgeId {
        let base = format!("e-{source}-{target}");
        let mut id = base.clone();
        let mut suffix = 1;
        while self.edges.contains_key(&id) {
            id = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.insert_edge(Edge::new(id.clone(), source, target));
        id
    }

    /// Insert an edge with a caller-chosen id.
    ///
    /// Returns `false` (and changes nothing) if the edge id is taken.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        if self.edges.contains_key(&edge.id) {
            return false;
        }
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(edge.id.clone());
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(edge.id.clone());
        debug!(edge = %edge.id, source = %edge.source, target = %edge.target, "graph: edge added");
        self.edges.insert(edge.id.clone(), edge);
        self.invalidate_schedules();
        true
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let edge = self.edges.remove(id)?;
        if let Some(ids) = self.outgoing.get_mut(&edge.source) {
            ids.retain(|e| e != id);
        }
        if let Some(ids) = self.incoming.get_mut(&edge.target) {
            ids.retain(|e| e != id);
        }
        self.invalidate_schedules();
        debug!(edge = %id, "graph: edge removed");
        Some(edge)
    }

    /// Drop every computed schedule.
    pub fn invalidate_schedules(&mut self) {
        for node in self.nodes.values_mut() {
            node.schedule = None;
        }
    }

    fn resolve<'a>(
        edges: &'a BTreeMap<EdgeId, Edge>,
        ids: Option<&'a Vec<EdgeId>>,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        ids.into_iter()
            .flatten()
            .filter_map(move |id| edges.get(id))
    }
}
