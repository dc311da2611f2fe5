mod common;

use common::{init_tracing, schedule_of, times_of};
use pertdag::graph::{Node, TaskGraph};
use pertdag::schedule::{backward_pass, forward_pass};
use pertdag::types::{END_NODE_ID, START_NODE_ID};
use pertdag_test_utils::builders::DiagramBuilder;

#[test]
fn join_takes_latest_predecessor() {
    init_tracing();

    // Start -> A(2) -> C(1), Start -> B(5) -> C, C -> End
    let diagram = DiagramBuilder::new()
        .task("A", 2.0)
        .task("B", 5.0)
        .task("C", 1.0)
        .chain(&["A", "C"])
        .connect(START_NODE_ID, "B")
        .connect("B", "C")
        .build();

    let forward = forward_pass(diagram.graph());
    assert_eq!(forward.get("C").map(|t| (t.es, t.ef)), Some((5.0, 6.0)));
    assert_eq!(forward.get(END_NODE_ID).map(|t| (t.es, t.ef)), Some((6.0, 6.0)));
    assert_eq!(forward.order.first().map(String::as_str), Some(START_NODE_ID));
    assert_eq!(forward.order.last().map(String::as_str), Some(END_NODE_ID));
}

#[test]
fn fork_takes_tightest_successor() {
    init_tracing();

    // Start -> A(1) -> B(2) -> End, A -> C(6) -> End
    let mut diagram = DiagramBuilder::new()
        .task("A", 1.0)
        .task("B", 2.0)
        .task("C", 6.0)
        .chain(&["A", "B"])
        .connect("A", "C")
        .connect("C", END_NODE_ID)
        .build();

    diagram.run_schedule();

    assert_eq!(times_of(&diagram, END_NODE_ID), (7.0, 7.0, 7.0, 7.0));
    assert_eq!(times_of(&diagram, "C"), (1.0, 7.0, 1.0, 7.0));
    assert_eq!(times_of(&diagram, "B"), (1.0, 3.0, 5.0, 7.0));
    // A has two successors: LS(B) = 5, LS(C) = 1. The smaller wins.
    assert_eq!(times_of(&diagram, "A"), (0.0, 1.0, 0.0, 1.0));
}

#[test]
fn unreachable_nodes_stay_unscheduled() {
    init_tracing();

    // X -> Y dangling, never connected to Start.
    let mut diagram = DiagramBuilder::new()
        .task("A", 3.0)
        .task("X", 1.0)
        .task("Y", 1.0)
        .chain(&["A"])
        .connect("X", "Y")
        .connect("Y", END_NODE_ID)
        .build();

    let summary = diagram.run_schedule();
    assert_eq!(summary.project_duration, Some(3.0));
    assert_eq!(summary.unscheduled, vec!["X", "Y"]);
    assert!(diagram.graph().node("X").unwrap().schedule.is_none());
    assert!(diagram.graph().node("Y").unwrap().schedule.is_none());
    assert_eq!(times_of(&diagram, "A"), (0.0, 3.0, 0.0, 3.0));
}

#[test]
fn dead_end_nodes_have_early_times_only() {
    init_tracing();

    // Start -> A(2) -> End, Start -> D(4) (no path to End)
    let mut diagram = DiagramBuilder::new()
        .task("A", 2.0)
        .task("D", 4.0)
        .chain(&["A"])
        .connect(START_NODE_ID, "D")
        .build();

    diagram.run_schedule();

    let d = schedule_of(&diagram, "D");
    assert_eq!((d.es, d.ef), (0.0, 4.0));
    assert_eq!((d.ls, d.lf), (None, None));
    assert_eq!(d.total_slack(), None);
    assert!(!d.is_critical(1e-9));

    assert_eq!(times_of(&diagram, START_NODE_ID), (0.0, 0.0, 0.0, 0.0));
}

#[test]
fn end_unreachable_means_no_backward_times() {
    init_tracing();

    let mut diagram = DiagramBuilder::new()
        .task("A", 2.0)
        .connect(START_NODE_ID, "A")
        .build();

    let summary = diagram.run_schedule();
    assert_eq!(summary.project_duration, None);
    assert_eq!(summary.unscheduled, vec![END_NODE_ID]);

    let forward = forward_pass(diagram.graph());
    let backward = backward_pass(diagram.graph(), &forward);
    assert!(backward.times.is_empty());
    assert!(diagram.find_critical_paths().is_empty());
}

#[test]
fn empty_diagram_connected_start_to_end_has_zero_duration() {
    let mut diagram = DiagramBuilder::new()
        .connect(START_NODE_ID, END_NODE_ID)
        .build();

    let summary = diagram.run_schedule();
    assert_eq!(summary.project_duration, Some(0.0));

    let critical = diagram.find_critical_paths();
    assert_eq!(critical.paths, vec![vec![START_NODE_ID, END_NODE_ID]]);
    assert_eq!(critical.critical_edge_ids.len(), 1);
}

#[test]
fn passes_run_on_a_bare_task_graph() {
    let mut graph = TaskGraph::new();
    graph.add_node(Node::task("A", "A", 2.0));
    graph.add_edge(START_NODE_ID, "A");
    graph.add_edge("A", END_NODE_ID);

    let forward = forward_pass(&graph);
    assert_eq!(forward.get(END_NODE_ID).map(|t| t.ef), Some(2.0));

    let backward = backward_pass(&graph, &forward);
    let a = backward.get("A").unwrap();
    assert_eq!((a.ls, a.lf), (0.0, 2.0));
    assert_eq!(backward.order.first().map(String::as_str), Some(END_NODE_ID));
}

#[test]
fn fractional_durations_stay_critical_within_tolerance() {
    init_tracing();

    let mut diagram = DiagramBuilder::new()
        .task("A", 0.1)
        .task("B", 0.2)
        .task("C", 0.3)
        .chain(&["A", "B"])
        .chain(&["C"])
        .build();

    diagram.run_schedule();
    let critical = diagram.find_critical_paths();
    // 0.1 + 0.2 and 0.3 are not bit-equal as floats, but both branches are
    // critical within the default tolerance.
    assert_eq!(critical.paths.len(), 2);
}
