// src/report.rs

//! Human- and machine-readable schedule reports for the CLI.

use std::fmt::Write as _;

use serde_json::json;

use crate::errors::Result;
use crate::graph::TaskGraph;
use crate::io::flatten;
use crate::schedule::{CriticalPaths, ScheduleSummary, scaled_tolerance};

/// Plain-text report: one line per node, then the critical paths.
///
/// `tolerance` is the configured one; it is scaled to the project here.
pub fn render_text(
    graph: &TaskGraph,
    summary: &ScheduleSummary,
    critical: &CriticalPaths,
    tolerance: f64,
) -> String {
    let tolerance = scaled_tolerance(tolerance, graph);
    let mut out = String::new();

    match summary.project_duration {
        Some(d) => {
            let _ = writeln!(out, "project duration: {}", fmt_num(d));
        }
        None => {
            let _ = writeln!(out, "project duration: unscheduled (End not reachable from Start)");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}  critical",
        "node", "duration", "ES", "EF", "LS", "LF", "slack"
    );
    for node in graph.nodes() {
        let (es, ef, ls, lf, slack) = match node.schedule {
            Some(s) => (
                fmt_num(s.es),
                fmt_num(s.ef),
                fmt_opt(s.ls),
                fmt_opt(s.lf),
                fmt_opt(s.total_slack()),
            ),
            None => ("-".into(), "-".into(), "-".into(), "-".into(), "-".into()),
        };
        let _ = writeln!(
            out,
            "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
            node.id,
            fmt_num(node.effective_duration()),
            es,
            ef,
            ls,
            lf,
            slack,
            if node.is_critical(tolerance) { "yes" } else { "no" }
        );
    }

    if !summary.unscheduled.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "unscheduled: {}", summary.unscheduled.join(", "));
    }

    let _ = writeln!(out);
    if critical.is_empty() {
        let _ = writeln!(out, "critical paths: none");
    } else {
        let _ = writeln!(out, "critical paths ({}):", critical.paths.len());
        for path in &critical.paths {
            let _ = writeln!(out, "  {}", path.join(" -> "));
        }
        if critical.truncated {
            let _ = writeln!(out, "  ... (truncated)");
        }
    }

    out
}

/// JSON report: the flat records with their schedule, plus the critical paths.
pub fn render_json(
    graph: &TaskGraph,
    summary: &ScheduleSummary,
    critical: &CriticalPaths,
) -> Result<String> {
    let doc = json!({
        "projectDuration": summary.project_duration,
        "unscheduled": summary.unscheduled,
        "diagram": flatten(graph),
        "criticalPaths": critical,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Structure-only listing used by `--dry-run`.
pub fn render_structure(graph: &TaskGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "pertdag dry-run");
    let _ = writeln!(out);
    let _ = writeln!(out, "tasks ({}):", graph.tasks().count());
    for node in graph.tasks() {
        let _ = writeln!(out, "  - {} ({})", node.id, node.name);
        let _ = writeln!(out, "      duration: {}", fmt_num(node.duration));
        let deps = graph.dependencies_of(&node.id);
        if !deps.is_empty() {
            let _ = writeln!(out, "      after: {:?}", deps);
        }
        if let Some(ref p) = node.priority {
            let _ = writeln!(out, "      priority: {p}");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "edges ({}):", graph.edge_count());
    for edge in graph.edges() {
        let _ = writeln!(out, "  - {}: {} -> {}", edge.id, edge.source, edge.target);
    }
    out
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(fmt_num).unwrap_or_else(|| "-".to_string())
}
