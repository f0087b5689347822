//! # Flow interpreter
//!
//! Walks a declarative flow graph one session at a time.
//!
//! ## Core Principles
//!
//! 1. **Data-driven dispatch**: behavior comes from state kinds plus a
//!    transition table keyed by (state id, selector), never from engine code
//! 2. **Stack-based sub-flows**: reusable sequences expand onto the cursor's
//!    frame stack instead of being repeated as transition entries
//! 3. **Pure executor**: no I/O, no async; `step` runs until it must suspend
//! 4. **Serializable state**: cursor + context is the whole session

pub mod context;
pub mod cursor;
pub mod engine;
pub mod errors;
pub mod exec_loop;
pub mod session;
pub mod transitions;
pub mod types;

#[cfg(test)]
mod tests;

pub use context::Context;
pub use cursor::{Cursor, Frame};
pub use engine::{Engine, DEFAULT_ENTRY_STATE};
pub use errors::EngineError;
pub use exec_loop::{step, step_with_limit, DEFAULT_MAX_ITERATIONS};
pub use session::Session;
pub use types::{ContextMap, Event, StepOutcome, Val, ViewPayload};
