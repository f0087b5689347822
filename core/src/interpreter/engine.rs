//! Engine facade
//!
//! Binds a loaded flow graph to the step function. The engine holds no
//! per-session data, so one engine serves any number of sessions.

use super::errors::EngineError;
use super::exec_loop::{step_with_limit, DEFAULT_MAX_ITERATIONS};
use super::session::Session;
use super::types::{ContextMap, Event, StepOutcome};
use crate::graph::{FlowGraph, StateId};

/// Entry decision node used when none is configured
pub const DEFAULT_ENTRY_STATE: &str = "resolver_branch";

#[derive(Debug, Clone)]
pub struct Engine<'g> {
    graph: &'g FlowGraph,
    entry_state: StateId,
    max_iterations: usize,
}

impl<'g> Engine<'g> {
    pub fn new(graph: &'g FlowGraph) -> Self {
        Self {
            graph,
            entry_state: DEFAULT_ENTRY_STATE.to_string(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn entry_state(mut self, entry: impl Into<StateId>) -> Self {
        self.entry_state = entry.into();
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Create a session at the entry state; nothing runs until the first step
    pub fn start(&self, context: ContextMap) -> Session {
        Session::start(self.entry_state.clone(), context)
    }

    /// Advance `session` with at most one event
    ///
    /// On an engine error the session is left exactly as it was before the
    /// call, so the caller can inspect or keep it.
    pub fn step(
        &self,
        session: &mut Session,
        event: Option<Event>,
    ) -> Result<StepOutcome, EngineError> {
        let mut cursor = session.cursor.clone();
        let mut context = session.context.clone();

        let outcome = step_with_limit(
            self.graph,
            &mut cursor,
            &mut context,
            event,
            self.max_iterations,
        )?;

        session.cursor = cursor;
        session.context = context;
        Ok(outcome)
    }

    /// One initial step, then one step per event
    pub fn run(
        &self,
        session: &mut Session,
        events: impl IntoIterator<Item = Event>,
    ) -> Result<Vec<StepOutcome>, EngineError> {
        let mut outcomes = vec![self.step(session, None)?];
        for event in events {
            outcomes.push(self.step(session, Some(event))?);
        }
        Ok(outcomes)
    }
}
