//! Session state
//!
//! A session is exactly a cursor plus a context store. Callers keep it
//! wherever they like between `step` calls, keyed by their own session id.

use super::context::Context;
use super::cursor::Cursor;
use super::errors::EngineError;
use super::exec_loop;
use super::types::{ContextMap, Event, StepOutcome};
use crate::graph::{FlowGraph, StateId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub cursor: Cursor,
    pub context: Context,
}

impl Session {
    /// New session positioned at `entry` with the caller's initial facts
    pub fn start(entry: impl Into<StateId>, context: ContextMap) -> Self {
        Self {
            cursor: Cursor::start(entry),
            context: Context::from_map(context),
        }
    }

    /// Advance this session over `graph` with at most one event
    ///
    /// Mutates in place; an error can leave the session part-way through a
    /// switch chain. [`Engine::step`](super::Engine::step) rolls back instead.
    pub fn step(
        &mut self,
        graph: &FlowGraph,
        event: Option<Event>,
    ) -> Result<StepOutcome, EngineError> {
        exec_loop::step(graph, &mut self.cursor, &mut self.context, event)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::loader::{parse_graph, DocFormat};
    use crate::interpreter::Val;

    #[test]
    fn test_step_suspends_and_finishes() {
        let graph = parse_graph(
            DocFormat::Yaml,
            r#"
states:
  start_branch:
    type: switch
    expression: mode
  ConfirmView:
    type: view
    interface: confirm
    expose: [mode]
"#,
            r#"
transitions:
  start_branch:
    Quick: ConfirmView
  ConfirmView:
    ok: ~
"#,
        )
        .unwrap();

        let mut session = Session::start(
            "start_branch",
            ContextMap::from([("mode".to_string(), "quick".into())]),
        );

        let outcome = session.step(&graph, None).unwrap();
        let view = outcome.as_view().unwrap();
        assert_eq!(view.interface, "confirm");
        assert_eq!(view.context["mode"], Val::from("quick"));
        assert!(!session.is_finished());

        let outcome = session.step(&graph, Some("OK".into())).unwrap();
        assert_eq!(outcome, StepOutcome::Finished);
        assert!(session.is_finished());
    }
}
