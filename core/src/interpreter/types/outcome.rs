//! Suspend payloads returned from `step`

use super::values::ContextMap;
use serde::{Deserialize, Serialize};

/// What a view suspend hands to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPayload {
    pub state_id: String,
    pub interface: String,
    /// Current values of the view's exposed keys (unset keys are `null`)
    pub context: ContextMap,
    /// One-shot domain error tag, present on the first view after the
    /// transition that raised it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
}

/// Result of one `step` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Suspended at a view, awaiting a UI event
    View(ViewPayload),
    /// Suspended at an action, awaiting the backend outcome
    ActionPending { state_id: String },
    /// Root flow and every stacked sub-flow are exhausted
    Finished,
}

impl StepOutcome {
    /// State id the session is suspended at, if any
    pub fn state_id(&self) -> Option<&str> {
        match self {
            StepOutcome::View(view) => Some(&view.state_id),
            StepOutcome::ActionPending { state_id } => Some(state_id),
            StepOutcome::Finished => None,
        }
    }

    pub fn as_view(&self) -> Option<&ViewPayload> {
        match self {
            StepOutcome::View(view) => Some(view),
            _ => None,
        }
    }
}
