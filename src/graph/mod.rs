// src/graph/mod.rs

//! Task graph model and its validated mutations.
//!
//! - [`node`] holds node data: tasks, sentinels and computed schedules.
//! - [`task_graph`] is the plain container with an adjacency index.
//! - [`connections`] enforces the connection rules on top of it.

pub mod connections;
pub mod node;
pub mod task_graph;

pub use connections::{ConnectionManager, check_connection};
pub use node::{Node, NodeKind, Position, Schedule};
pub use task_graph::{DEFAULT_END_POSITION, DEFAULT_START_POSITION, Edge, TaskGraph};
