//! Execution cursor
//!
//! The cursor holds the run-time position of a session:
//! - current: state to execute next (`None` once a transition hands control back)
//! - stack: in-progress sub-flow frames
//! - pending_error: one-shot domain error tag for the next view
//!
//! Together with the context store this is everything needed to serialize
//! and resume a session.

use super::errors::EngineError;
use crate::graph::StateId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/* ===================== Cursor ===================== */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub current: Option<StateId>,
    pub stack: Vec<Frame>,
    pub pending_error: Option<String>,
}

/// One in-progress sub-flow: its id and the members not yet started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub subflow: StateId,
    pub remaining: VecDeque<StateId>,
}

impl Cursor {
    /// Cursor positioned at the session's entry state
    pub fn start(entry: impl Into<StateId>) -> Self {
        Self {
            current: Some(entry.into()),
            stack: Vec::new(),
            pending_error: None,
        }
    }

    /// True once the root flow and every stacked sub-flow are exhausted
    pub fn is_finished(&self) -> bool {
        self.current.is_none() && self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Read and clear the pending error tag
    pub fn take_pending_error(&mut self) -> Option<String> {
        self.pending_error.take()
    }
}

/* ===================== Sub-flow Stack ===================== */

/// Push a sub-flow frame and move to its first member
///
/// Entering a sub-flow that is already on the stack restarts it: the stack is
/// unwound down to that frame first, so depth never exceeds nesting depth.
pub fn enter_subflow(
    cursor: &mut Cursor,
    subflow: &str,
    flow: &[StateId],
) -> Result<(), EngineError> {
    let Some((head, tail)) = flow.split_first() else {
        return Err(EngineError::EmptySubflow(subflow.to_string()));
    };

    if let Some(pos) = cursor.stack.iter().position(|f| f.subflow == subflow) {
        debug!(
            subflow,
            dropped = cursor.stack.len() - pos,
            "Re-entering sub-flow, unwinding stack"
        );
        cursor.stack.truncate(pos);
    }

    cursor.stack.push(Frame {
        subflow: subflow.to_string(),
        remaining: tail.iter().cloned().collect(),
    });
    cursor.current = Some(head.clone());

    debug!(subflow, head = %head, depth = cursor.stack.len(), "Entered sub-flow");
    Ok(())
}

/// Pop-and-advance after a state hands control back without a target
///
/// Dequeues the next member of the innermost sub-flow with members left,
/// discarding exhausted frames on the way. Leaves `current` as `None` when
/// the stack runs out.
pub fn advance(cursor: &mut Cursor) {
    while let Some(frame) = cursor.stack.last_mut() {
        if let Some(next) = frame.remaining.pop_front() {
            debug!(subflow = %frame.subflow, next = %next, "Next state in sub-flow");
            cursor.current = Some(next);
            return;
        }

        debug!(subflow = %frame.subflow, "Sub-flow complete, popping");
        cursor.stack.pop();
    }

    cursor.current = None;
}
