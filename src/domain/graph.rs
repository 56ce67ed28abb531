//! Dependency graph over breakdown records
//!
//! Nodes are names: every record summary and every epic name, sharing one
//! namespace. Edges run epic -> task for ownership and task -> dependency for
//! named dependencies. The graph is rebuilt from scratch for every request
//! and may contain cycles. Uses petgraph for storage and algorithms.

use petgraph::algo::is_cyclic_directed;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::trace;

use super::record::{TaskRecord, DEFAULT_DEPENDENCY_SEPARATOR};

/// Role of a named node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Epic,
    Task,
    /// The same name is used both as an epic and as a task
    Both,
}

impl NodeKind {
    fn merge(self, other: NodeKind) -> NodeKind {
        if self == other {
            self
        } else {
            NodeKind::Both
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Epic => f.write_str("epic"),
            NodeKind::Task => f.write_str("task"),
            NodeKind::Both => f.write_str("both"),
        }
    }
}

/// A node in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub name: String,
    pub kind: NodeKind,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Type of edge between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Epic owns task
    Contains,
    /// Task depends on task
    DependsOn,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Contains => f.write_str("contains"),
            EdgeKind::DependsOn => f.write_str("depends_on"),
        }
    }
}

/// A directed edge, by node name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Directed graph of epics, tasks and their dependencies
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<GraphNode, EdgeKind>,

    /// Map from node name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from records using the default dependency separator
    pub fn from_records(records: &[TaskRecord]) -> Self {
        Self::from_records_with_separator(records, DEFAULT_DEPENDENCY_SEPARATOR)
    }

    /// Builds a graph from records, splitting dependency fields on `separator`
    pub fn from_records_with_separator(records: &[TaskRecord], separator: &str) -> Self {
        let mut graph = Self::new();

        // First pass: nodes and epic -> task edges
        for record in records {
            let kind = if record.issue_kind.is_epic() {
                NodeKind::Epic
            } else {
                NodeKind::Task
            };

            if record.epic_name.is_empty() {
                graph.ensure_node(&record.summary, kind);
            } else {
                let epic = graph.ensure_node(&record.epic_name, NodeKind::Epic);
                let task = graph.ensure_node(&record.summary, kind);
                graph.add_edge(epic, task, EdgeKind::Contains);
            }
        }

        // Second pass: dependency edges, resolved against every summary
        let summaries: HashSet<&str> = records.iter().map(|r| r.summary.as_str()).collect();
        for record in records {
            for name in record.dependency_names(separator) {
                if !summaries.contains(name) {
                    trace!(task = %record.summary, dependency = name, "Dropping unresolved dependency");
                    continue;
                }
                if let (Some(&from), Some(&to)) =
                    (graph.node_map.get(&record.summary), graph.node_map.get(name))
                {
                    graph.add_edge(from, to, EdgeKind::DependsOn);
                }
            }
        }

        graph
    }

    /// Returns the node for `name`, creating it on first reference
    fn ensure_node(&mut self, name: &str, kind: NodeKind) -> NodeIndex {
        match self.node_map.get(name) {
            Some(&idx) => {
                let node = &mut self.graph[idx];
                node.kind = node.kind.merge(kind);
                idx
            }
            None => {
                let idx = self.graph.add_node(GraphNode {
                    name: name.to_string(),
                    kind,
                });
                self.node_map.insert(name.to_string(), idx);
                idx
            }
        }
    }

    /// Adds an edge unless the same edge already exists
    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) {
        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|edge| *edge.weight() == kind);
        if !exists {
            self.graph.add_edge(from, to, kind);
        }
    }

    /// Nodes in order of first occurrence
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Edges in insertion order
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.graph
            .edge_references()
            .map(|edge| GraphEdge {
                from: self.graph[edge.source()].name.clone(),
                to: self.graph[edge.target()].name.clone(),
                kind: *edge.weight(),
            })
            .collect()
    }

    /// Returns the node with the given name
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.node_map.get(name).map(|&idx| &self.graph[idx])
    }

    /// Returns true if any edge runs from `from` to `to`
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&a), Some(&b)) => self.graph.find_edge(a, b).is_some(),
            _ => false,
        }
    }

    /// Tasks owned by an epic
    pub fn children_of(&self, epic: &str) -> Vec<&str> {
        self.neighbors(epic, EdgeKind::Contains)
    }

    /// Names a task depends on
    pub fn dependencies_of(&self, task: &str) -> Vec<&str> {
        self.neighbors(task, EdgeKind::DependsOn)
    }

    fn neighbors(&self, name: &str, kind: EdgeKind) -> Vec<&str> {
        let idx = match self.node_map.get(name) {
            Some(&idx) => idx,
            None => return vec![],
        };

        // petgraph walks outgoing edges newest first
        let mut names: Vec<&str> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|edge| *edge.weight() == kind)
            .map(|edge| self.graph[edge.target()].name.as_str())
            .collect();
        names.reverse();
        names
    }

    /// Returns true if the graph contains a cycle (including self-loops)
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Renders the graph in Graphviz DOT format
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }

    /// Returns true if the graph contains the node
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Returns the number of nodes in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

/// Builds the dependency graph for `records`
pub fn build_graph(records: &[TaskRecord]) -> DependencyGraph {
    DependencyGraph::from_records(records)
}
