//! Type definitions for the interpreter
//!
//! - Context values (Val, ContextMap)
//! - Events supplied by the caller (Event)
//! - Suspend payloads (StepOutcome, ViewPayload)

pub mod event;
pub mod outcome;
pub mod values;

pub use event::Event;
pub use outcome::{StepOutcome, ViewPayload};
pub use values::{normalize_key, ContextMap, Val};
