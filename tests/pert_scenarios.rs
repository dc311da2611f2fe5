mod common;

use common::{init_tracing, path, schedule_of, times_of};
use pertdag::diagram::DiagramState;
use pertdag::types::{END_NODE_ID, START_NODE_ID};
use pertdag_test_utils::builders::DiagramBuilder;

#[test]
fn chain_of_three_tasks_is_fully_critical() {
    init_tracing();

    // Start -> T1(2) -> T2(3) -> T3(5) -> End
    let mut diagram = DiagramBuilder::new()
        .task("T1", 2.0)
        .task("T2", 3.0)
        .task("T3", 5.0)
        .chain(&["T1", "T2", "T3"])
        .build();

    let summary = diagram.run_schedule();
    assert_eq!(summary.project_duration, Some(10.0));
    assert!(summary.unscheduled.is_empty());

    assert_eq!(times_of(&diagram, "T1"), (0.0, 2.0, 0.0, 2.0));
    assert_eq!(times_of(&diagram, "T2"), (2.0, 5.0, 2.0, 5.0));
    assert_eq!(times_of(&diagram, "T3"), (5.0, 10.0, 5.0, 10.0));
    assert_eq!(times_of(&diagram, END_NODE_ID), (10.0, 10.0, 10.0, 10.0));
    assert_eq!(times_of(&diagram, START_NODE_ID), (0.0, 0.0, 0.0, 0.0));

    let critical = diagram.find_critical_paths();
    assert_eq!(
        critical.paths,
        vec![path(&[START_NODE_ID, "T1", "T2", "T3", END_NODE_ID])]
    );
    assert_eq!(critical.critical_edge_ids.len(), 4);
    assert!(!critical.truncated);
}

#[test]
fn parallel_branches_only_longest_is_critical() {
    init_tracing();

    // Start -> A(4) -> End, Start -> B(7) -> End
    let mut diagram = DiagramBuilder::new()
        .task("A", 4.0)
        .task("B", 7.0)
        .chain(&["A"])
        .chain(&["B"])
        .build();

    let summary = diagram.run_schedule();
    assert_eq!(summary.project_duration, Some(7.0));

    assert_eq!(times_of(&diagram, "B"), (0.0, 7.0, 0.0, 7.0));
    assert_eq!(times_of(&diagram, "A"), (0.0, 4.0, 3.0, 7.0));
    assert_eq!(schedule_of(&diagram, "A").total_slack(), Some(3.0));

    let tolerance = diagram.options().schedule.slack_tolerance;
    assert!(diagram.graph().node("B").unwrap().is_critical(tolerance));
    assert!(!diagram.graph().node("A").unwrap().is_critical(tolerance));

    let critical = diagram.find_critical_paths();
    assert_eq!(critical.paths, vec![path(&[START_NODE_ID, "B", END_NODE_ID])]);

    let edge_start_b = diagram.graph().directed_edge(START_NODE_ID, "B").unwrap().id.clone();
    let edge_b_end = diagram.graph().directed_edge("B", END_NODE_ID).unwrap().id.clone();
    let mut expected = vec![edge_start_b, edge_b_end];
    expected.sort();
    assert_eq!(critical.critical_edge_ids, expected);
}

#[test]
fn connecting_out_of_end_leaves_edges_unchanged() {
    init_tracing();

    let mut diagram = DiagramBuilder::new().task("A", 1.0).chain(&["A"]).build();
    let before = diagram.graph().edge_count();

    assert!(diagram.create_connection(END_NODE_ID, "A").is_err());
    assert_eq!(diagram.graph().edge_count(), before);
}

#[test]
fn state_machine_follows_schedule_and_mutations() {
    init_tracing();

    let mut diagram = DiagramBuilder::new()
        .task("A", 1.0)
        .task("B", 2.0)
        .chain(&["A"])
        .build();
    assert_eq!(diagram.state(), DiagramState::Unscheduled);

    // Critical path search before scheduling: empty, state unchanged.
    assert!(diagram.find_critical_paths().is_empty());
    assert_eq!(diagram.state(), DiagramState::Unscheduled);

    diagram.run_schedule();
    assert_eq!(diagram.state(), DiagramState::Scheduled);
    assert!(diagram.graph().has_schedule());

    diagram.find_critical_paths();
    assert_eq!(diagram.state(), DiagramState::CriticalPathsComputed);
    assert!(diagram.critical_paths().is_some());

    diagram.create_connection("A", "B").unwrap();
    assert_eq!(diagram.state(), DiagramState::Unscheduled);
    assert!(!diagram.graph().has_schedule());
    assert!(diagram.critical_paths().is_none());
}

#[test]
fn rejected_mutation_keeps_schedule() {
    init_tracing();

    let mut diagram = DiagramBuilder::new().task("A", 1.0).chain(&["A"]).build();
    diagram.run_schedule();

    assert!(diagram.create_connection("A", "A").is_err());
    assert!(diagram.delete_node(START_NODE_ID).is_err());

    assert_eq!(diagram.state(), DiagramState::Scheduled);
    assert!(diagram.graph().has_schedule());
}

#[test]
fn rescheduling_unchanged_graph_is_idempotent() {
    init_tracing();

    let mut diagram = DiagramBuilder::new()
        .task("A", 3.0)
        .task("B", 1.5)
        .task("C", 2.0)
        .chain(&["A", "C"])
        .chain(&["B", "C"])
        .build();

    let first_summary = diagram.run_schedule();
    let first_graph: Vec<_> = diagram.graph().nodes().cloned().collect();
    let first_paths = diagram.find_critical_paths();

    let second_summary = diagram.run_schedule();
    let second_graph: Vec<_> = diagram.graph().nodes().cloned().collect();
    let second_paths = diagram.find_critical_paths();

    assert_eq!(first_summary, second_summary);
    assert_eq!(first_graph, second_graph);
    assert_eq!(first_paths, second_paths);
}

#[test]
fn duration_change_invalidates_and_reschedules() {
    init_tracing();

    let mut diagram = DiagramBuilder::new()
        .task("A", 4.0)
        .task("B", 7.0)
        .chain(&["A"])
        .chain(&["B"])
        .build();
    diagram.run_schedule();

    diagram.set_duration("A", 9.0).unwrap();
    assert_eq!(diagram.state(), DiagramState::Unscheduled);

    let summary = diagram.run_schedule();
    assert_eq!(summary.project_duration, Some(9.0));
    let critical = diagram.find_critical_paths();
    assert_eq!(critical.paths, vec![path(&[START_NODE_ID, "A", END_NODE_ID])]);
}
