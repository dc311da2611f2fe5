mod common;

use std::path::PathBuf;

use common::init_tracing;
use pertdag::cli::{CliArgs, FormatArg};
use pertdag::diagram::DiagramOptions;
use pertdag::fs::FileSystem;
use pertdag::fs::mock::MockFileSystem;
use pertdag::io::{load_diagram, save_diagram};
use pertdag::report::{render_json, render_structure, render_text};
use pertdag::run_with_fs;
use pertdag::types::{END_NODE_ID, START_NODE_ID};
use pertdag_test_utils::builders::DiagramBuilder;

fn args(input: &str) -> CliArgs {
    CliArgs {
        input: PathBuf::from(input),
        config: None,
        format: None,
        export: None,
        log_level: None,
        dry_run: false,
    }
}

fn seeded_fs() -> MockFileSystem {
    let diagram = DiagramBuilder::new()
        .task("A", 4.0)
        .task("B", 7.0)
        .chain(&["A"])
        .chain(&["B"])
        .build();
    let fs = MockFileSystem::new();
    save_diagram(&fs, PathBuf::from("diagram.json").as_path(), diagram.graph()).unwrap();
    fs
}

#[test]
fn mock_fs_save_then_load() {
    init_tracing();

    let fs = seeded_fs();
    let path = PathBuf::from("diagram.json");
    assert!(fs.exists(&path));

    let (graph, report) = load_diagram(&fs, &path, &DiagramOptions::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(graph.tasks().count(), 2);
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn loading_missing_file_fails() {
    let fs = MockFileSystem::new();
    let path = PathBuf::from("nope.json");
    let result = load_diagram(&fs, &path, &DiagramOptions::default());
    assert!(result.is_err());
}

#[test]
fn run_exports_scheduled_diagram() {
    init_tracing();

    let fs = seeded_fs();
    let mut args = args("diagram.json");
    args.export = Some(PathBuf::from("out/scheduled.json"));
    args.format = Some(FormatArg::Json);

    run_with_fs(args, &fs).unwrap();

    let exported = fs.contents("out/scheduled.json").expect("export written");
    let doc: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let tasks = doc["tasks"].as_array().unwrap();
    let a = tasks.iter().find(|t| t["id"] == "A").unwrap();
    assert_eq!(a["ES"], 0.0);
    assert_eq!(a["LS"], 3.0);
    assert_eq!(a["LF"], 7.0);
}

#[test]
fn dry_run_does_not_export() {
    let fs = seeded_fs();
    let mut args = args("diagram.json");
    args.dry_run = true;
    args.export = Some(PathBuf::from("never.json"));

    run_with_fs(args, &fs).unwrap();
    assert!(fs.contents("never.json").is_none());
}

#[test]
fn text_report_lists_nodes_and_paths() {
    let mut diagram = DiagramBuilder::new()
        .task("A", 4.0)
        .task("B", 7.0)
        .chain(&["A"])
        .chain(&["B"])
        .build();
    let summary = diagram.run_schedule();
    let critical = diagram.find_critical_paths();

    let text = render_text(diagram.graph(), &summary, &critical, 1e-9);
    assert!(text.contains("project duration: 7"));
    assert!(text.contains(&format!("{START_NODE_ID} -> B -> {END_NODE_ID}")));
    let a_line = text.lines().find(|l| l.starts_with("A ")).unwrap();
    assert!(a_line.trim_end().ends_with("no"));
    assert!(a_line.contains('3'));

    let json = render_json(diagram.graph(), &summary, &critical).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(doc["projectDuration"], 7.0);
    assert_eq!(doc["criticalPaths"]["paths"][0][1], "B");
    assert_eq!(doc["criticalPaths"]["criticalEdgeIds"].as_array().unwrap().len(), 2);

    let structure = render_structure(diagram.graph());
    assert!(structure.contains("tasks (2):"));
    assert!(structure.contains("edges (4):"));
}
