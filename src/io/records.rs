// src/io/records.rs

//! Flat, storage-friendly record shapes.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, NodeId};

/// Separator used in [`TaskRecord::dependencies`].
pub const DEPENDENCY_SEPARATOR: &str = "|";

/// Record `type` written for task nodes.
pub const TASK_RECORD_TYPE: &str = "task";

/// One task node as stored by the backend or written to an export file.
///
/// Start and End are never stored; they are rebuilt on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position_x: f64,
    pub position_y: f64,
    pub name: String,
    pub duration: f64,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(rename = "ES", default)]
    pub es: Option<f64>,
    #[serde(rename = "EF", default)]
    pub ef: Option<f64>,
    #[serde(rename = "LS", default)]
    pub ls: Option<f64>,
    #[serde(rename = "LF", default)]
    pub lf: Option<f64>,
    #[serde(default)]
    pub data_position_x: Option<f64>,
    #[serde(default)]
    pub data_position_y: Option<f64>,
    /// Ids of the nodes this task depends on, joined by `|`.
    #[serde(default)]
    pub dependencies: String,
}

impl TaskRecord {
    /// The ids listed in `dependencies`, skipping empty segments.
    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .split(DEPENDENCY_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// A whole diagram in flat form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlatDiagram {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// Which record list a rejected entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Task,
    Edge,
    Dependency,
}

/// A record that could not be imported, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub kind: RecordKind,
    /// Position in its list (`tasks` or `edges`; for dependencies, the task's).
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// What an import skipped. Empty when everything was applied.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImportReport {
    pub rejected: Vec<RejectedRecord>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub(crate) fn reject(
        &mut self,
        kind: RecordKind,
        index: usize,
        id: Option<&str>,
        reason: impl Into<String>,
    ) {
        self.rejected.push(RejectedRecord {
            kind,
            index,
            id: id.map(str::to_string),
            reason: reason.into(),
        });
    }
}
