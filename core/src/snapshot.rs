//! Session snapshots
//!
//! Envelope a caller can store between `step` calls: the session itself plus
//! the correlation id it is stored under, the graph version it ran against
//! and when it was taken. Storage is entirely up to the caller.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::graph::FlowGraph;
use crate::interpreter::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub graph_version: String,
    pub saved_at: DateTime<Utc>,
    pub session: Session,
}

impl SessionSnapshot {
    pub fn capture(session_id: Uuid, graph: &FlowGraph, session: &Session) -> Self {
        Self {
            session_id,
            graph_version: graph.version().to_string(),
            saved_at: Utc::now(),
            session: session.clone(),
        }
    }

    /// Unwrap the session for `graph`
    ///
    /// A version mismatch is logged and tolerated: the cursor may still name
    /// states that exist, and a missing one fails loudly on the next step.
    pub fn restore(self, graph: &FlowGraph) -> Session {
        if self.graph_version != graph.version() {
            warn!(
                session_id = %self.session_id,
                saved = %self.graph_version,
                loaded = %graph.version(),
                "Resuming session against a different flow graph version"
            );
        }
        self.session
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize session snapshot")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse session snapshot")
    }
}
