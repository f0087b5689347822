//! Core execution loop
//!
//! This module contains the step() function - the heart of the interpreter.
//! It walks non-suspending states (switches, sub-flow expansion, sub-flow
//! pops) until it reaches a view or action that needs outside input, or the
//! flow is exhausted.
//!
//! ## Function Organization
//! 1. step() / step_with_limit() - Main execution loop
//! 2. consume_event() / render_view() - Per-kind helpers

use super::context::Context;
use super::cursor::{advance, enter_subflow, Cursor};
use super::errors::EngineError;
use super::transitions::resolve;
use super::types::{Event, StepOutcome, ViewPayload};
use crate::graph::{FlowGraph, StateKind};
use tracing::{debug, info, warn};

/// Non-suspending iterations allowed in one `step` call
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/* ===================== Public API ===================== */

/// Advance the session until it must suspend or the flow is exhausted
///
/// `event` is the outcome reported for the state the session is suspended
/// at; it is consumed by the first action or view reached and discarded by
/// anything else.
pub fn step(
    graph: &FlowGraph,
    cursor: &mut Cursor,
    context: &mut Context,
    event: Option<Event>,
) -> Result<StepOutcome, EngineError> {
    step_with_limit(graph, cursor, context, event, DEFAULT_MAX_ITERATIONS)
}

/// Same as [`step`] with an explicit cap on non-suspending iterations
pub fn step_with_limit(
    graph: &FlowGraph,
    cursor: &mut Cursor,
    context: &mut Context,
    mut event: Option<Event>,
    max_iterations: usize,
) -> Result<StepOutcome, EngineError> {
    let mut iterations = 0;

    loop {
        iterations += 1;
        if iterations > max_iterations {
            return Err(EngineError::StepLimitExceeded(max_iterations));
        }

        // No current state: hand control back to the enclosing sub-flow
        let Some(state_id) = cursor.current.clone() else {
            if cursor.stack.is_empty() {
                discard(&mut event, "<finished>");
                info!("Flow finished");
                return Ok(StepOutcome::Finished);
            }
            advance(cursor);
            continue;
        };

        let state = graph
            .state(&state_id)
            .ok_or_else(|| EngineError::UnknownState(state_id.clone()))?;

        debug!(
            state = %state_id,
            kind = state.kind.name(),
            depth = cursor.depth(),
            pending_error = cursor.pending_error.as_deref(),
            "Executing state"
        );

        match &state.kind {
            StateKind::Switch { expression } => {
                discard(&mut event, &state_id);
                let selector = context.selector_for(expression);
                debug!(state = %state_id, expression = %expression, value = %selector, "Switch");
                cursor.current = resolve(graph, cursor, context, &state_id, &selector)?;
            }

            StateKind::Action => {
                let Some(ev) = event.take() else {
                    info!(state = %state_id, "Awaiting action outcome");
                    return Ok(StepOutcome::ActionPending { state_id });
                };
                cursor.current = consume_event(graph, cursor, context, &state_id, ev)?;
            }

            StateKind::View { interface, expose } => {
                let Some(ev) = event.take() else {
                    let payload = render_view(cursor, context, &state_id, interface, expose);
                    info!(
                        state = %state_id,
                        interface = %interface,
                        error_id = payload.error_id.as_deref(),
                        "Rendering view"
                    );
                    return Ok(StepOutcome::View(payload));
                };
                cursor.current = consume_event(graph, cursor, context, &state_id, ev)?;
            }

            StateKind::Subflow { flow } => {
                discard(&mut event, &state_id);
                enter_subflow(cursor, &state_id, flow)?;
            }

            StateKind::Invalid { declared, reason } => {
                return Err(EngineError::MalformedState {
                    state: state_id,
                    declared: declared.clone(),
                    reason: reason.clone(),
                });
            }
        }
    }
}

/* ===================== Helpers ===================== */

/// Merge an event's context updates, then resolve its outcome key
fn consume_event(
    graph: &FlowGraph,
    cursor: &mut Cursor,
    context: &mut Context,
    state_id: &str,
    event: Event,
) -> Result<Option<String>, EngineError> {
    let (outcome, updates) = event.into_parts();
    debug!(state = state_id, outcome = %outcome, updates = updates.len(), "Consuming event");

    if !updates.is_empty() {
        context.merge(&updates);
    }
    resolve(graph, cursor, context, state_id, &outcome)
}

/// Build the view payload, reading (and clearing) the pending error
fn render_view(
    cursor: &mut Cursor,
    context: &Context,
    state_id: &str,
    interface: &str,
    expose: &[String],
) -> ViewPayload {
    ViewPayload {
        state_id: state_id.to_string(),
        interface: interface.to_string(),
        context: context.expose(expose),
        error_id: cursor.take_pending_error(),
    }
}

/// Drop an event that reached a state which never consumes one
fn discard(event: &mut Option<Event>, state_id: &str) {
    if let Some(ev) = event.take() {
        warn!(state = state_id, outcome = ev.outcome(), "Discarding event");
    }
}
