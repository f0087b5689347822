//! Test helpers for interpreter tests
//!
//! Common utilities for building graphs and sessions

use crate::graph::loader::{parse_graph, DocFormat};
use crate::graph::FlowGraph;
use crate::interpreter::{Context, ContextMap, Cursor, Val};

/// Build a graph from JSON states/transitions documents
pub fn graph_from_json(states: &str, transitions: &str) -> FlowGraph {
    parse_graph(DocFormat::Json, states, transitions).expect("Graph should parse")
}

/// Build a graph from YAML states/transitions documents
pub fn graph_from_yaml(states: &str, transitions: &str) -> FlowGraph {
    parse_graph(DocFormat::Yaml, states, transitions).expect("Graph should parse")
}

/// Cursor at `entry` plus a context built from string pairs
pub fn start(entry: &str, pairs: &[(&str, &str)]) -> (Cursor, Context) {
    let vars: ContextMap = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Val::from(*v)))
        .collect();
    (Cursor::start(entry), Context::from_map(vars))
}
