// src/lib.rs

pub mod cli;
pub mod config;
pub mod diagram;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod io;
pub mod logging;
pub mod report;
pub mod schedule;
pub mod types;

use anyhow::Result;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::resolve_config;
use crate::diagram::{Diagram, DiagramOptions};
use crate::fs::{FileSystem, RealFileSystem};
use crate::io::{load_diagram, save_diagram};
use crate::types::ReportFormat;

pub use crate::diagram::DiagramState;
pub use crate::errors::{PertError, Rejection};
pub use crate::graph::{Edge, Node, NodeKind, Position, Schedule, TaskGraph};
pub use crate::schedule::{CriticalPaths, ScheduleSummary};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - diagram import (rejected records are logged, not fatal)
/// - forward / backward pass and critical path search
/// - report output and optional export
pub fn run(args: CliArgs) -> Result<()> {
    run_with_fs(args, &RealFileSystem)
}

/// [`run`] against an arbitrary filesystem; the report goes to stdout.
pub fn run_with_fs(args: CliArgs, fs: &dyn FileSystem) -> Result<()> {
    let cfg = resolve_config(args.config.as_deref())?;
    let options = DiagramOptions::from_config(&cfg);

    let (graph, import_report) = load_diagram(fs, &args.input, &options)?;
    for rejected in &import_report.rejected {
        warn!(
            kind = ?rejected.kind,
            index = rejected.index,
            id = ?rejected.id,
            reason = %rejected.reason,
            "record not imported"
        );
    }

    if args.dry_run {
        print!("{}", report::render_structure(&graph));
        return Ok(());
    }

    let mut diagram = Diagram::from_graph(graph, options);
    let summary = diagram.run_schedule();
    let critical = diagram.find_critical_paths();
    info!(
        paths = critical.paths.len(),
        critical_edges = critical.critical_edge_ids.len(),
        "critical paths computed"
    );

    let format = args.format.map(ReportFormat::from).unwrap_or(cfg.report.format);
    let rendered = match format {
        ReportFormat::Text => report::render_text(
            diagram.graph(),
            &summary,
            &critical,
            options.schedule.slack_tolerance,
        ),
        ReportFormat::Json => report::render_json(diagram.graph(), &summary, &critical)?,
    };
    println!("{}", rendered.trim_end());

    if let Some(ref path) = args.export {
        save_diagram(fs, path, diagram.graph())?;
        info!(path = ?path, "scheduled diagram exported");
    }

    Ok(())
}
