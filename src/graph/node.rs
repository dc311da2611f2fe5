// src/graph/node.rs

//! Node data: tasks, the Start/End sentinels and their computed schedule.

use serde::{Deserialize, Serialize};

use crate::types::{END_NODE_ID, NodeId, START_NODE_ID};

/// Kind of a node in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Task,
}

/// 2D coordinate carried through unchanged for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Computed PERT times of a node.
///
/// `es`/`ef` come from the forward pass. `ls`/`lf` come from the backward
/// pass and stay `None` for nodes that cannot reach End.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Schedule {
    pub es: f64,
    pub ef: f64,
    pub ls: Option<f64>,
    pub lf: Option<f64>,
}

impl Schedule {
    /// Total float (`LS - ES`), if the backward pass reached this node.
    pub fn total_slack(&self) -> Option<f64> {
        self.ls.map(|ls| ls - self.es)
    }

    /// Zero slack on both ends, within the absolute `tolerance`.
    ///
    /// Pass a tolerance already scaled to the project, e.g. with
    /// [`scaled_tolerance`](crate::schedule::scaled_tolerance).
    pub fn is_critical(&self, tolerance: f64) -> bool {
        match (self.ls, self.lf) {
            (Some(ls), Some(lf)) => {
                (self.es - ls).abs() <= tolerance && (self.ef - lf).abs() <= tolerance
            }
            _ => false,
        }
    }
}

/// A node of the task graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    /// Non-negative; always 0 for sentinels.
    pub duration: f64,
    pub position: Position,
    /// Position of the node's inner label, as stored by the diagram editor.
    pub data_position: Position,
    pub priority: Option<String>,
    /// `None` until a schedule pass has reached this node.
    pub schedule: Option<Schedule>,
}

impl Node {
    /// A regular task node at the origin.
    pub fn task(id: impl Into<NodeId>, name: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Task,
            name: name.into(),
            duration,
            position: Position::default(),
            data_position: Position::default(),
            priority: None,
            schedule: None,
        }
    }

    pub fn start(position: Position) -> Self {
        Self::sentinel(START_NODE_ID, NodeKind::Start, "Start", position)
    }

    pub fn end(position: Position) -> Self {
        Self::sentinel(END_NODE_ID, NodeKind::End, "End", position)
    }

    fn sentinel(id: &str, kind: NodeKind, name: &str, position: Position) -> Self {
        Self {
            id: id.to_string(),
            kind,
            name: name.to_string(),
            duration: 0.0,
            position,
            data_position: position,
            priority: None,
            schedule: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self.data_position = position;
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.kind, NodeKind::Start | NodeKind::End)
    }

    /// Duration used by the passes: sentinels always count as 0.
    pub fn effective_duration(&self) -> f64 {
        if self.is_sentinel() { 0.0 } else { self.duration }
    }

    pub fn is_critical(&self, tolerance: f64) -> bool {
        self.schedule
            .as_ref()
            .is_some_and(|s| s.is_critical(tolerance))
    }
}
