// src/io/serializer.rs

//! Conversion between a [`TaskGraph`] and its flat record form.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::diagram::DiagramOptions;
use crate::errors::{PertError, Result};
use crate::fs::FileSystem;
use crate::graph::{ConnectionManager, Edge, Node, NodeKind, Position, TaskGraph};
use crate::io::records::{
    DEPENDENCY_SEPARATOR, EdgeRecord, FlatDiagram, ImportReport, RecordKind, TASK_RECORD_TYPE,
    TaskRecord,
};

/// Flatten a graph into task and edge records.
///
/// Tasks are ordered by id; Start and End are left out. Schedule fields are
/// `None` for nodes without a computed schedule.
pub fn flatten(graph: &TaskGraph) -> FlatDiagram {
    let tasks = graph
        .tasks()
        .map(|node| {
            let schedule = node.schedule.as_ref();
            let dependencies = graph
                .dependencies_of(&node.id)
                .join(DEPENDENCY_SEPARATOR);
            TaskRecord {
                id: node.id.clone(),
                node_type: TASK_RECORD_TYPE.to_string(),
                position_x: node.position.x,
                position_y: node.position.y,
                name: node.name.clone(),
                duration: node.duration,
                priority: node.priority.clone(),
                es: schedule.map(|s| s.es),
                ef: schedule.map(|s| s.ef),
                ls: schedule.and_then(|s| s.ls),
                lf: schedule.and_then(|s| s.lf),
                data_position_x: Some(node.data_position.x),
                data_position_y: Some(node.data_position.y),
                dependencies,
            }
        })
        .collect();

    let edges = graph
        .edges()
        .map(|e| EdgeRecord {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
        })
        .collect();

    FlatDiagram { tasks, edges }
}

/// Rebuild a graph from flat records.
///
/// Sentinels are recreated at the positions in `options`; stored records of
/// type `start` / `end` are skipped. Records that cannot be applied (bad
/// duration, duplicate or sentinel id, illegal or cyclic edge, dangling
/// dependency) are skipped and listed in the returned report.
/// Stored schedule fields are ignored; run the schedule again.
pub fn unflatten(flat: &FlatDiagram, options: &DiagramOptions) -> (TaskGraph, ImportReport) {
    let tasks: Vec<(usize, TaskRecord)> = flat.tasks.iter().cloned().enumerate().collect();
    let edges: Vec<(usize, EdgeRecord)> = flat.edges.iter().cloned().enumerate().collect();
    let mut report = ImportReport::default();
    let graph = build_graph(tasks, edges, options, &mut report);
    (graph, report)
}

/// Parse a JSON export and rebuild its graph.
///
/// Each record is decoded on its own, so one record with a missing or
/// mistyped field is rejected without failing the whole import. A document
/// that is not a JSON object with array-valued `tasks` / `edges` is an error.
pub fn import_json(text: &str, options: &DiagramOptions) -> Result<(TaskGraph, ImportReport)> {
    let doc: Value = serde_json::from_str(text)?;
    let Value::Object(mut doc) = doc else {
        return Err(PertError::ImportError(
            "diagram document must be a JSON object".to_string(),
        ));
    };

    let mut report = ImportReport::default();
    let tasks =
        decode_list::<TaskRecord>(doc.remove("tasks"), "tasks", RecordKind::Task, &mut report)?;
    let edges =
        decode_list::<EdgeRecord>(doc.remove("edges"), "edges", RecordKind::Edge, &mut report)?;

    let graph = build_graph(tasks, edges, options, &mut report);
    Ok((graph, report))
}

/// Serialise a graph as pretty-printed JSON records.
pub fn export_json(graph: &TaskGraph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&flatten(graph))?)
}

/// Read and import a diagram file.
pub fn load_diagram(
    fs: &dyn FileSystem,
    path: &Path,
    options: &DiagramOptions,
) -> Result<(TaskGraph, ImportReport)> {
    let text = fs.read_to_string(path)?;
    let (graph, report) = import_json(&text, options)?;
    info!(
        path = ?path,
        tasks = graph.tasks().count(),
        edges = graph.edge_count(),
        rejected = report.rejected.len(),
        "diagram loaded"
    );
    Ok((graph, report))
}

/// Export a diagram to a file.
pub fn save_diagram(fs: &dyn FileSystem, path: &Path, graph: &TaskGraph) -> Result<()> {
    let text = export_json(graph)?;
    fs.write(path, text.as_bytes())?;
    debug!(path = ?path, "diagram saved");
    Ok(())
}

fn decode_list<T: serde::de::DeserializeOwned>(
    value: Option<Value>,
    field: &str,
    kind: RecordKind,
    report: &mut ImportReport,
) -> Result<Vec<(usize, T)>> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(PertError::ImportError(format!(
                "`{field}` must be an array"
            )));
        }
    };

    let mut decoded = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let id = item.get("id").and_then(Value::as_str).map(str::to_string);
        match serde_json::from_value::<T>(item) {
            Ok(record) => decoded.push((index, record)),
            Err(e) => {
                warn!(field, index, id = ?id, error = %e, "skipping malformed record");
                report.reject(kind, index, id.as_deref(), e.to_string());
            }
        }
    }
    Ok(decoded)
}

fn build_graph(
    tasks: Vec<(usize, TaskRecord)>,
    edges: Vec<(usize, EdgeRecord)>,
    options: &DiagramOptions,
    report: &mut ImportReport,
) -> TaskGraph {
    let mut graph = options.empty_graph();
    let mut imported: Vec<(usize, TaskRecord)> = Vec::with_capacity(tasks.len());

    {
        let mut manager = ConnectionManager::new(&mut graph, options.cycle_policy);
        for (index, record) in tasks {
            if is_sentinel_record(&record) {
                debug!(id = %record.id, "ignoring stored sentinel record");
                continue;
            }
            match manager.add_task(node_from_record(&record)) {
                Ok(()) => imported.push((index, record)),
                Err(rejection) => {
                    warn!(id = %record.id, %rejection, "task record rejected");
                    report.reject(RecordKind::Task, index, Some(&record.id), rejection.to_string());
                }
            }
        }

        for (index, record) in edges {
            let edge = Edge::new(record.id, record.source, record.target);
            let id = edge.id.clone();
            if let Err(rejection) = manager.restore_connection(edge) {
                warn!(edge = %id, %rejection, "edge record rejected");
                report.reject(RecordKind::Edge, index, Some(&id), rejection.to_string());
            }
        }
    }

    // Dependencies not backed by a stored edge get one now.
    for (index, record) in &imported {
        for dep in record.dependency_ids() {
            if graph.directed_edge(dep, &record.id).is_some() {
                continue;
            }
            let mut manager = ConnectionManager::new(&mut graph, options.cycle_policy);
            if let Err(rejection) = manager.create_connection(dep, &record.id) {
                report.reject(
                    RecordKind::Dependency,
                    *index,
                    Some(&record.id),
                    format!("dependency on {dep}: {rejection}"),
                );
            }
        }
    }

    graph
}

/// Stored Start/End records, recognised by their `type`. A task record that
/// reuses a sentinel id is not one of these; it is rejected as a duplicate.
fn is_sentinel_record(record: &TaskRecord) -> bool {
    let kind = record.node_type.trim().to_lowercase();
    matches!(kind.as_str(), "start" | "end")
}

fn node_from_record(record: &TaskRecord) -> Node {
    let position = Position::new(record.position_x, record.position_y);
    let data_position = match (record.data_position_x, record.data_position_y) {
        (Some(x), Some(y)) => Position::new(x, y),
        _ => position,
    };
    Node {
        id: record.id.clone(),
        kind: NodeKind::Task,
        name: record.name.clone(),
        duration: record.duration,
        position,
        data_position,
        priority: record.priority.clone(),
        schedule: None,
    }
}
