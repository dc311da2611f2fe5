use std::collections::BTreeSet;

use pertdag::diagram::{Diagram, DiagramOptions};
use pertdag::errors::Rejection;
use pertdag::graph::Node;
use pertdag::io::{flatten, unflatten};
use pertdag::types::{END_NODE_ID, START_NODE_ID};
use proptest::prelude::*;

/// A random layered DAG: `task_i` may only depend on `task_j` with `j < i`.
/// Tasks without dependencies hang off Start, tasks without dependents
/// feed End, so every task lies on some Start -> End path.
#[derive(Debug, Clone)]
struct Layout {
    durations: Vec<u32>,
    deps: Vec<BTreeSet<usize>>,
}

fn layout_strategy(max_tasks: usize) -> impl Strategy<Value = Layout> {
    (1..=max_tasks).prop_flat_map(|n| {
        (
            proptest::collection::vec(0u32..10, n),
            proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..3), n),
        )
            .prop_map(move |(durations, raw)| {
                let deps = raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, picks)| {
                        if i == 0 {
                            BTreeSet::new()
                        } else {
                            picks.into_iter().map(|p| p % i).collect()
                        }
                    })
                    .collect();
                Layout { durations, deps }
            })
    })
}

fn name(i: usize) -> String {
    format!("task_{i}")
}

fn build(layout: &Layout) -> Diagram {
    let mut diagram = Diagram::new(DiagramOptions::default());
    for (i, d) in layout.durations.iter().enumerate() {
        diagram.add_task(Node::task(name(i), name(i), *d as f64)).unwrap();
    }
    let mut has_dependents = vec![false; layout.durations.len()];
    for (i, deps) in layout.deps.iter().enumerate() {
        if deps.is_empty() {
            diagram.create_connection(START_NODE_ID, &name(i)).unwrap();
        }
        for &j in deps {
            diagram.create_connection(&name(j), &name(i)).unwrap();
            has_dependents[j] = true;
        }
    }
    for (i, has) in has_dependents.into_iter().enumerate() {
        if !has {
            diagram.create_connection(&name(i), END_NODE_ID).unwrap();
        }
    }
    diagram
}

proptest! {
    #[test]
    fn passes_satisfy_pert_equations(layout in layout_strategy(8)) {
        let mut diagram = build(&layout);
        let summary = diagram.run_schedule();
        prop_assert!(summary.unscheduled.is_empty());

        let graph = diagram.graph();
        let end = graph.node(END_NODE_ID).unwrap().schedule.unwrap();
        prop_assert_eq!(summary.project_duration, Some(end.ef));
        prop_assert_eq!(end.ls, Some(end.ef));
        prop_assert_eq!(end.lf, Some(end.ef));

        for node in graph.nodes() {
            let s = node.schedule.unwrap();
            prop_assert_eq!(s.ef, s.es + node.effective_duration());

            let preds = graph.nodes_incoming_to(&node.id);
            let expected_es = preds
                .iter()
                .map(|p| graph.node(p).unwrap().schedule.unwrap().ef)
                .fold(0.0_f64, f64::max);
            prop_assert_eq!(s.es, expected_es, "ES of {}", &node.id);

            if node.id != END_NODE_ID {
                let expected_lf = graph
                    .nodes_outgoing_from(&node.id)
                    .iter()
                    .filter_map(|succ| graph.node(succ).unwrap().schedule.unwrap().ls)
                    .fold(f64::INFINITY, f64::min);
                prop_assert_eq!(s.lf, Some(expected_lf), "LF of {}", &node.id);
            }

            let slack = s.total_slack().unwrap();
            prop_assert!(slack >= 0.0, "negative slack on {}", &node.id);
        }

        let start = graph.node(START_NODE_ID).unwrap().schedule.unwrap();
        prop_assert_eq!(start.es, 0.0);
        prop_assert_eq!(start.ls, Some(0.0));
    }

    #[test]
    fn every_critical_path_spans_the_project(layout in layout_strategy(8)) {
        let mut diagram = build(&layout);
        let summary = diagram.run_schedule();
        let critical = diagram.find_critical_paths();
        let duration = summary.project_duration.unwrap();

        prop_assert!(!critical.is_empty());
        prop_assert!(!critical.truncated);

        let graph = diagram.graph();
        for path in &critical.paths {
            prop_assert_eq!(path.first().map(String::as_str), Some(START_NODE_ID));
            prop_assert_eq!(path.last().map(String::as_str), Some(END_NODE_ID));

            let total: f64 = path
                .iter()
                .map(|id| graph.node(id).unwrap().effective_duration())
                .sum();
            prop_assert_eq!(total, duration);

            for pair in path.windows(2) {
                let edge = graph.directed_edge(&pair[0], &pair[1]);
                prop_assert!(edge.is_some());
                prop_assert!(critical.critical_edge_ids.contains(&edge.unwrap().id));
            }
        }
    }

    #[test]
    fn scheduling_twice_is_idempotent(layout in layout_strategy(8)) {
        let mut diagram = build(&layout);
        diagram.run_schedule();
        let first: Vec<_> = diagram.graph().nodes().map(|n| n.schedule).collect();
        diagram.run_schedule();
        let second: Vec<_> = diagram.graph().nodes().map(|n| n.schedule).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn flat_records_rebuild_the_same_graph(layout in layout_strategy(8)) {
        let diagram = build(&layout);
        let flat = flatten(diagram.graph());

        let (restored, report) = unflatten(&flat, &DiagramOptions::default());
        prop_assert!(report.is_clean());
        prop_assert_eq!(restored.edge_count(), diagram.graph().edge_count());
        prop_assert_eq!(flatten(&restored), flat);
    }

    #[test]
    fn reversing_an_edge_is_rejected(layout in layout_strategy(8)) {
        let mut diagram = build(&layout);
        let edges: Vec<(String, String)> = diagram
            .graph()
            .edges()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();
        let before = diagram.graph().edge_count();

        for (source, target) in edges {
            let result = diagram.create_connection(&target, &source);
            prop_assert!(result.is_err());
            prop_assert!(!matches!(result, Err(Rejection::MissingNode(_))));
        }
        prop_assert_eq!(diagram.graph().edge_count(), before);
    }
}
