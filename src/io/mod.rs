// src/io/mod.rs

//! Import / export of diagrams as flat records.
//!
//! The flat form is what the storage backend keeps per diagram and what
//! export files contain: one [`TaskRecord`] per task node (sentinels are
//! never stored) and one [`EdgeRecord`] per edge.

pub mod records;
pub mod serializer;

pub use records::{
    EdgeRecord, FlatDiagram, ImportReport, RecordKind, RejectedRecord, TaskRecord,
};
pub use serializer::{export_json, flatten, import_json, load_diagram, save_diagram, unflatten};
