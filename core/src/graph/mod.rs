//! Flow graph
//!
//! Immutable description of every state and every transition edge of one
//! login/account-access interaction. Built once from configuration and only
//! read afterwards. Nothing here validates the graph: a dangling reference or
//! an unrecognized state kind is reported by the interpreter when execution
//! reaches it.

pub mod loader;


use serde::Deserialize;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::interpreter::types::{normalize_key, ContextMap, Val};

pub use loader::{load_graph, GraphError};

pub type StateId = String;

/* ===================== States ===================== */

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: StateId,
    pub kind: StateKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateKind {
    /// Routes on the current value of a context key
    Switch { expression: String },
    /// Suspends until a backend action reports its outcome
    Action,
    /// Suspends until the UI reports an event
    View {
        interface: String,
        expose: Vec<String>,
    },
    /// Expands into a fixed ordered sequence of other states
    Subflow { flow: Vec<StateId> },
    /// Declaration the interpreter cannot run
    Invalid { declared: String, reason: String },
}

impl StateKind {
    pub fn name(&self) -> &str {
        match self {
            StateKind::Switch { .. } => "switch",
            StateKind::Action => "action",
            StateKind::View { .. } => "view",
            StateKind::Subflow { .. } => "subflow",
            StateKind::Invalid { declared, .. } => declared,
        }
    }
}

/// State as written in a states document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateDecl {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default, alias = "context_keys")]
    pub expose: Vec<String>,
    #[serde(default)]
    pub flow: Option<Vec<StateId>>,
}

impl StateDecl {
    fn into_kind(self) -> StateKind {
        let declared = self.kind.unwrap_or_default();
        let invalid = |reason: &str| StateKind::Invalid {
            declared: declared.clone(),
            reason: reason.to_string(),
        };

        match declared.as_str() {
            "switch" => match self.expression {
                Some(expression) => StateKind::Switch { expression },
                None => invalid("switch has no 'expression'"),
            },
            "action" => StateKind::Action,
            "view" => match self.interface {
                Some(interface) => StateKind::View {
                    interface,
                    expose: self.expose,
                },
                None => invalid("view has no 'interface'"),
            },
            "subflow" | "sub-flow" => match self.flow {
                Some(flow) => StateKind::Subflow { flow },
                None => invalid("sub-flow has no 'flow'"),
            },
            "" => invalid("missing 'type'"),
            _ => invalid("unrecognized state type"),
        }
    }
}

/* ===================== Transitions ===================== */

/// Resolved edge for a (state, selector) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionEntry {
    /// Next state; `None` continues the enclosing sub-flow
    pub target: Option<StateId>,
    /// Domain error tag surfaced at the next view
    pub error_id: Option<String>,
    /// Context updates applied before the target runs
    pub context: ContextMap,
}

/// Transition as written in a transitions document
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransitionDecl {
    Target(Option<StateId>),
    Detailed {
        #[serde(default)]
        target: Option<StateId>,
        #[serde(default)]
        error_id: Option<String>,
        #[serde(default)]
        context: ContextMap,
    },
}

impl From<TransitionDecl> for TransitionEntry {
    fn from(decl: TransitionDecl) -> Self {
        match decl {
            TransitionDecl::Target(target) => TransitionEntry {
                target,
                ..Default::default()
            },
            TransitionDecl::Detailed {
                target,
                error_id,
                context,
            } => TransitionEntry {
                target,
                error_id,
                context,
            },
        }
    }
}

/// Selector key as written in a transitions document
///
/// YAML allows `true:`, `3:` or `2.5:` as map keys, so keys are read as
/// scalars and folded into the same normalized text a context value selects
/// as. Equality and hashing go through that normalized text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SelectorKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SelectorKey {
    pub fn normalized(&self) -> String {
        match self {
            SelectorKey::Null => Val::Null.selector(),
            SelectorKey::Bool(b) => Val::Bool(*b).selector(),
            SelectorKey::Int(n) => n.to_string(),
            SelectorKey::Float(n) => Val::Num(*n).selector(),
            SelectorKey::Text(s) => normalize_key(s),
        }
    }
}

impl PartialEq for SelectorKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for SelectorKey {}

impl Hash for SelectorKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

/* ===================== Documents ===================== */

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatesDoc {
    pub states: HashMap<StateId, StateDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionsDoc {
    #[serde(default)]
    pub transitions: HashMap<StateId, HashMap<SelectorKey, TransitionDecl>>,
}

/* ===================== Graph ===================== */

#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    states: HashMap<StateId, State>,
    transitions: HashMap<StateId, HashMap<String, TransitionEntry>>,
    version: String,
}

impl FlowGraph {
    /// Build a graph from parsed documents
    ///
    /// Transition keys are normalized so lookups are case-insensitive.
    pub fn from_parts(states: StatesDoc, transitions: TransitionsDoc) -> Self {
        let states = states
            .states
            .into_iter()
            .map(|(id, decl)| {
                let state = State {
                    id: id.clone(),
                    kind: decl.into_kind(),
                };
                (id, state)
            })
            .collect();

        let transitions = transitions
            .transitions
            .into_iter()
            .map(|(id, edges)| {
                let edges = edges
                    .into_iter()
                    .map(|(key, decl)| (key.normalized(), TransitionEntry::from(decl)))
                    .collect();
                (id, edges)
            })
            .collect();

        Self {
            states,
            transitions,
            version: String::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    /// Transition entry for `selector`, compared case-insensitively
    pub fn transition(&self, id: &str, selector: &str) -> Option<&TransitionEntry> {
        self.transitions.get(id)?.get(&normalize_key(selector))
    }

    /// All transition entries declared for a state
    pub fn transitions_from(&self, id: &str) -> Option<&HashMap<String, TransitionEntry>> {
        self.transitions.get(id)
    }

    /// Content hash of the sources this graph was loaded from
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}
