//! Scripted sessions
//!
//! A scenario file lists sessions to replay against a graph: an initial
//! context and the ordered events a user and the backend would report.
//! Each scenario gets a fresh session and produces a transcript.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::graph::loader::read_doc;
use crate::interpreter::{ContextMap, Engine, Event, StepOutcome};

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    #[serde(alias = "tests")]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: ContextMap,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Outcome of replaying one scenario
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub id: String,
    pub description: String,
    pub steps: Vec<TranscriptStep>,
    /// Engine failure that ended the scenario early
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptStep {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    pub outcome: StepOutcome,
}

impl Transcript {
    pub fn last_outcome(&self) -> Option<&StepOutcome> {
        self.steps.last().map(|s| &s.outcome)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Load a scenario file (YAML, JSON or TOML)
pub fn load_scenarios(path: impl AsRef<Path>) -> Result<Vec<Scenario>> {
    let path = path.as_ref();
    let file: ScenarioFile = read_doc(path)
        .with_context(|| format!("Failed to load scenarios from {}", path.display()))?;
    Ok(file.scenarios)
}

/// Replay one scenario on a fresh session
pub fn run_scenario(engine: &Engine<'_>, scenario: &Scenario) -> Transcript {
    info!(scenario = %scenario.id, "Running scenario");

    let mut session = engine.start(scenario.context.clone());
    let mut transcript = Transcript {
        id: scenario.id.clone(),
        description: scenario.description.clone(),
        steps: Vec::new(),
        error: None,
    };

    let inputs = std::iter::once(None).chain(scenario.events.iter().cloned().map(Some));
    for (index, event) in inputs.enumerate() {
        match engine.step(&mut session, event.clone()) {
            Ok(outcome) => transcript.steps.push(TranscriptStep {
                index,
                event,
                outcome,
            }),
            Err(err) => {
                warn!(scenario = %scenario.id, index, error = %err, "Scenario aborted");
                transcript.error = Some(err.to_string());
                break;
            }
        }
    }

    transcript
}

/// Replay every scenario; a failing scenario does not stop the rest
pub fn run_all(engine: &Engine<'_>, scenarios: &[Scenario]) -> Vec<Transcript> {
    scenarios.iter().map(|s| run_scenario(engine, s)).collect()
}
