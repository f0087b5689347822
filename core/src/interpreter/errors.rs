//! Engine failures
//!
//! These are configuration defects: the flow graph is malformed. User-facing
//! conditions (bad password, expired token) are domain error tags carried on
//! transition entries and never show up here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("No transition from '{state}' for selector '{selector}'")]
    NoTransition { state: String, selector: String },

    #[error("State '{0}' is referenced but not declared")]
    UnknownState(String),

    #[error("State '{state}' declared as '{declared}' is malformed: {reason}")]
    MalformedState {
        state: String,
        declared: String,
        reason: String,
    },

    #[error("Sub-flow '{0}' declares no members")]
    EmptySubflow(String),

    #[error("Step exceeded {0} iterations without suspending")]
    StepLimitExceeded(usize),
}
