#![allow(dead_code)]

use pertdag::config::{ConfigFile, RawConfigFile};
use pertdag::diagram::{Diagram, DiagramOptions};
use pertdag::graph::{Node, Position};
use pertdag::types::{CyclePolicy, END_NODE_ID, START_NODE_ID};

/// Builder for `Diagram` to simplify test setup.
///
/// Connections are applied in the order they were added and must all be
/// accepted; use `Diagram` directly to test rejections.
pub struct DiagramBuilder {
    options: DiagramOptions,
    tasks: Vec<Node>,
    connections: Vec<(String, String)>,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self {
            options: DiagramOptions::default(),
            tasks: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: DiagramOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.options.cycle_policy = policy;
        self
    }

    pub fn task(mut self, id: &str, duration: f64) -> Self {
        self.tasks.push(Node::task(id, id, duration));
        self
    }

    pub fn task_at(mut self, id: &str, duration: f64, x: f64, y: f64) -> Self {
        self.tasks
            .push(Node::task(id, id, duration).with_position(Position::new(x, y)));
        self
    }

    pub fn connect(mut self, source: &str, target: &str) -> Self {
        self.connections.push((source.to_string(), target.to_string()));
        self
    }

    /// Connect `Start -> ids[0] -> ids[1] -> ... -> End`.
    pub fn chain(mut self, ids: &[&str]) -> Self {
        let mut prev = START_NODE_ID.to_string();
        for id in ids {
            self.connections.push((prev, id.to_string()));
            prev = id.to_string();
        }
        self.connections.push((prev, END_NODE_ID.to_string()));
        self
    }

    pub fn build(self) -> Diagram {
        let mut diagram = Diagram::new(self.options);
        for node in self.tasks {
            let id = node.id.clone();
            diagram
                .add_task(node)
                .unwrap_or_else(|e| panic!("builder: task {id} rejected: {e}"));
        }
        for (source, target) in self.connections {
            diagram
                .create_connection(&source, &target)
                .unwrap_or_else(|e| panic!("builder: {source} -> {target} rejected: {e}"));
        }
        diagram
    }
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ConfigFile`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn slack_tolerance(mut self, tolerance: f64) -> Self {
        self.config.schedule.slack_tolerance = tolerance;
        self
    }

    pub fn max_critical_paths(mut self, max: usize) -> Self {
        self.config.schedule.max_critical_paths = max;
        self
    }

    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.config.connections.cycle_policy = policy;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
