// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::NodeId;

#[derive(Error, Debug)]
pub enum PertError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Operation rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a graph mutation was refused.
///
/// A rejected operation never changes the graph, so callers can always
/// attempt an operation and branch on the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("node not found: {0}")]
    MissingNode(NodeId),

    #[error("node already exists: {0}")]
    DuplicateNode(NodeId),

    #[error("the Start node cannot have incoming connections")]
    TargetIsStart,

    #[error("the End node cannot have outgoing connections")]
    SourceIsEnd,

    #[error("node {0} cannot be connected to itself")]
    SelfLoop(NodeId),

    #[error("nodes {0} and {1} are already connected")]
    AlreadyConnected(NodeId, NodeId),

    #[error("connecting {from} -> {to} would create a cycle")]
    WouldCreateCycle { from: NodeId, to: NodeId },

    #[error("no connection between {0} and {1}")]
    NoSuchConnection(NodeId, NodeId),

    #[error("sentinel node {0} cannot be added, modified or deleted")]
    SentinelNode(NodeId),

    #[error("invalid duration {duration} for node {id}")]
    InvalidDuration { id: NodeId, duration: f64 },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PertError>;
