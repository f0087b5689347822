//! Externally supplied events

use super::values::ContextMap;
use serde::{Deserialize, Serialize};

/// Event handed to `step` by the caller
///
/// Either a bare outcome key (`"success"`, `"submit_password"`) or an outcome
/// key together with context updates to merge before the key is resolved.
/// Every action and view state accepts both forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Outcome(String),
    Structured {
        #[serde(alias = "type")]
        outcome: String,
        #[serde(default)]
        context: ContextMap,
    },
}

impl Event {
    pub fn outcome(&self) -> &str {
        match self {
            Event::Outcome(key) => key,
            Event::Structured { outcome, .. } => outcome,
        }
    }

    /// Split into the outcome key and any context updates it carries
    pub fn into_parts(self) -> (String, ContextMap) {
        match self {
            Event::Outcome(key) => (key, ContextMap::new()),
            Event::Structured { outcome, context } => (outcome, context),
        }
    }

    pub fn with_context(outcome: impl Into<String>, context: ContextMap) -> Self {
        Event::Structured {
            outcome: outcome.into(),
            context,
        }
    }
}

impl From<&str> for Event {
    fn from(key: &str) -> Self {
        Event::Outcome(key.to_string())
    }
}

impl From<String> for Event {
    fn from(key: String) -> Self {
        Event::Outcome(key)
    }
}
