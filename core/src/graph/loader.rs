//! Flow graph loading
//!
//! Reads a states document and a transitions document from disk and builds a
//! [`FlowGraph`]. The format is chosen by file extension (YAML, JSON or TOML).
//! Only the in-memory shape matters; no cross-reference checks happen here.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::{FlowGraph, StatesDoc, TransitionsDoc};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Failed to read flow document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse flow document {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported flow document extension for {} (expected yaml, yml, json or toml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Document encodings the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Yaml,
    Json,
    Toml,
}

impl DocFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(DocFormat::Yaml),
            "json" => Some(DocFormat::Json),
            "toml" => Some(DocFormat::Toml),
            _ => None,
        }
    }

    pub fn parse<T: serde::de::DeserializeOwned>(self, source: &str) -> Result<T, String> {
        match self {
            DocFormat::Yaml => serde_yaml::from_str(source).map_err(|e| e.to_string()),
            DocFormat::Json => serde_json::from_str(source).map_err(|e| e.to_string()),
            DocFormat::Toml => toml::from_str(source).map_err(|e| e.to_string()),
        }
    }
}

/// Load a flow graph from a states file and a transitions file
pub fn load_graph(
    states_path: impl AsRef<Path>,
    transitions_path: impl AsRef<Path>,
) -> Result<FlowGraph, GraphError> {
    let states_path = states_path.as_ref();
    let transitions_path = transitions_path.as_ref();

    let states_src = read_source(states_path)?;
    let transitions_src = read_source(transitions_path)?;

    let states: StatesDoc = parse_doc(states_path, &states_src)?;
    let transitions: TransitionsDoc = parse_doc(transitions_path, &transitions_src)?;

    let graph = FlowGraph::from_parts(states, transitions)
        .with_version(hash_sources(&states_src, &transitions_src));

    debug!(
        states = %states_path.display(),
        transitions = %transitions_path.display(),
        state_count = graph.state_count(),
        version = &graph.version()[..8],
        "Loaded flow graph"
    );

    Ok(graph)
}

/// Build a flow graph from in-memory sources of a known format
pub fn parse_graph(
    format: DocFormat,
    states_src: &str,
    transitions_src: &str,
) -> Result<FlowGraph, GraphError> {
    let states: StatesDoc = format.parse(states_src).map_err(|message| GraphError::Parse {
        path: PathBuf::from("<states>"),
        message,
    })?;
    let transitions: TransitionsDoc =
        format
            .parse(transitions_src)
            .map_err(|message| GraphError::Parse {
                path: PathBuf::from("<transitions>"),
                message,
            })?;

    Ok(FlowGraph::from_parts(states, transitions)
        .with_version(hash_sources(states_src, transitions_src)))
}

/// Read and parse any document the loader understands
pub fn read_doc<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, GraphError> {
    let path = path.as_ref();
    let source = read_source(path)?;
    parse_doc(path, &source)
}

fn read_source(path: &Path) -> Result<String, GraphError> {
    std::fs::read_to_string(path).map_err(|source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_doc<T: serde::de::DeserializeOwned>(path: &Path, source: &str) -> Result<T, GraphError> {
    let format = DocFormat::from_path(path).ok_or_else(|| GraphError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    format.parse(source).map_err(|message| GraphError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Hash both graph sources using SHA256
fn hash_sources(states_src: &str, transitions_src: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(states_src.as_bytes());
    hasher.update([0u8]);
    hasher.update(transitions_src.as_bytes());
    format!("{:x}", hasher.finalize())
}
