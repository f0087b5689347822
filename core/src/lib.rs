pub mod cli;
pub mod config;
pub mod graph;
pub mod init;
pub mod interpreter;
pub mod scenarios;
pub mod snapshot;

// Re-export main types
pub use graph::{load_graph, FlowGraph};
pub use interpreter::{Engine, EngineError, Event, Session, StepOutcome};
pub use snapshot::SessionSnapshot;

// Re-export init API for convenience
pub use init::{initialize, InitBuilder, InitOptions};
