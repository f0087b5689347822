//! Transition resolution
//!
//! Binds a (state id, selector) pair to the graph's transition entry and
//! applies its side effects. Order matters: context updates are merged first,
//! then the error tag is set, then the target is reported, so the next
//! suspend sees both together.

use super::context::Context;
use super::cursor::Cursor;
use super::errors::EngineError;
use crate::graph::{FlowGraph, StateId};
use tracing::debug;

/// Resolve and apply the transition for `selector` out of `state_id`
///
/// Returns the entry's target; `None` means "continue the enclosing sub-flow".
pub fn resolve(
    graph: &FlowGraph,
    cursor: &mut Cursor,
    context: &mut Context,
    state_id: &str,
    selector: &str,
) -> Result<Option<StateId>, EngineError> {
    let entry = graph
        .transition(state_id, selector)
        .ok_or_else(|| EngineError::NoTransition {
            state: state_id.to_string(),
            selector: selector.to_string(),
        })?;

    if !entry.context.is_empty() {
        context.merge(&entry.context);
    }

    // A tag is only ever replaced by another tag; entries without one leave
    // an unseen tag in place for the next view.
    if let Some(error_id) = &entry.error_id {
        cursor.pending_error = Some(error_id.clone());
    }

    debug!(
        from = state_id,
        on = selector,
        target = entry.target.as_deref().unwrap_or("<continue>"),
        error_id = entry.error_id.as_deref(),
        merged = entry.context.len(),
        "Transition"
    );

    Ok(entry.target.clone())
}
