#![allow(dead_code)]

use pertdag::diagram::Diagram;
use pertdag::graph::Schedule;

pub use pertdag_test_utils::init_tracing;

/// Schedule of `id`, panicking with a readable message if it is missing.
pub fn schedule_of(diagram: &Diagram, id: &str) -> Schedule {
    diagram
        .graph()
        .node(id)
        .unwrap_or_else(|| panic!("node {id} missing"))
        .schedule
        .unwrap_or_else(|| panic!("node {id} has no schedule"))
}

/// `(ES, EF, LS, LF)` of `id`; LS/LF must be present.
pub fn times_of(diagram: &Diagram, id: &str) -> (f64, f64, f64, f64) {
    let s = schedule_of(diagram, id);
    (
        s.es,
        s.ef,
        s.ls.unwrap_or_else(|| panic!("node {id} has no LS")),
        s.lf.unwrap_or_else(|| panic!("node {id} has no LF")),
    )
}

pub fn path(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
