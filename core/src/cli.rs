use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::graph::loader::read_doc;
use crate::graph::{FlowGraph, StateKind};
use crate::init::{initialize, InitOptions};
use crate::interpreter::{ContextMap, Event};
use crate::scenarios;
use crate::snapshot::SessionSnapshot;

#[derive(Parser)]
#[command(name = "accessflow")]
#[command(about = "accessflow - step through a declarative login flow graph", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// States document (overrides config file and env vars)
    #[arg(long, global = true)]
    pub states: Option<PathBuf>,

    /// Transitions document (overrides config file and env vars)
    #[arg(long, global = true)]
    pub transitions: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start or resume a session and feed it events
    Run {
        /// Initial context: inline JSON object or a YAML/JSON/TOML file
        #[arg(short = 'c', long = "context", default_value = "{}")]
        context: String,

        /// File with an `events:` list to feed after the first step
        #[arg(short = 'e', long = "events")]
        events: Option<PathBuf>,

        /// Resume from a snapshot written by --snapshot-out
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Write the session snapshot here after the last step
        #[arg(long)]
        snapshot_out: Option<PathBuf>,
    },

    /// Run every scenario in a scenario file
    Scenarios {
        /// Scenario file (`scenarios:` or `tests:` list)
        file: PathBuf,
    },

    /// Show a state and its transition entries
    Inspect {
        /// State id to show
        state_id: String,
    },
}

#[derive(Debug, Deserialize)]
struct EventScript {
    #[serde(default)]
    events: Vec<Event>,
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<()> {
    let app = initialize(InitOptions {
        config_path: cli.config,
        states_path: cli.states,
        transitions_path: cli.transitions,
        install_logging: true,
        skip_env: false,
    })?;
    let engine = app.engine();

    match cli.command {
        Commands::Run {
            context,
            events,
            resume,
            snapshot_out,
        } => {
            let (session_id, mut session) = match resume {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
                    let snapshot = SessionSnapshot::from_json(&json)?;
                    let id = snapshot.session_id;
                    (id, snapshot.restore(&app.graph))
                }
                None => (Uuid::new_v4(), engine.start(parse_context(&context)?)),
            };

            let events = match events {
                Some(path) => {
                    let script: EventScript = read_doc(&path)
                        .with_context(|| format!("Failed to load events {}", path.display()))?;
                    script.events
                }
                None => Vec::new(),
            };

            println!("{}", json!({ "session_id": session_id }));

            let outcome = engine.step(&mut session, None)?;
            println!("{}", json!({ "event": null, "outcome": outcome }));
            for event in events {
                let outcome = engine.step(&mut session, Some(event.clone()))?;
                println!("{}", json!({ "event": event, "outcome": outcome }));
            }

            if let Some(path) = snapshot_out {
                let snapshot = SessionSnapshot::capture(session_id, &app.graph, &session);
                std::fs::write(&path, snapshot.to_json()?)
                    .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
                eprintln!("✓ Snapshot written to {}", path.display());
            }
        }

        Commands::Scenarios { file } => {
            let scenarios = scenarios::load_scenarios(&file)?;
            let transcripts = scenarios::run_all(&engine, &scenarios);

            let failed = transcripts.iter().filter(|t| !t.is_ok()).count();
            for transcript in &transcripts {
                println!("{}", serde_json::to_string_pretty(transcript)?);
            }

            println!(
                "Ran {} scenario(s), {} failed",
                transcripts.len(),
                failed
            );
            if failed > 0 {
                anyhow::bail!("{} scenario(s) failed", failed);
            }
        }

        Commands::Inspect { state_id } => {
            print_state(&app.graph, &state_id)?;
        }
    }

    Ok(())
}

/// Inline JSON object, or a document on disk
fn parse_context(arg: &str) -> Result<ContextMap> {
    let trimmed = arg.trim_start();
    if trimmed.starts_with('{') {
        return serde_json::from_str(arg).context("Invalid --context JSON");
    }
    read_doc(Path::new(arg)).with_context(|| format!("Failed to load context from {}", arg))
}

fn print_state(graph: &FlowGraph, state_id: &str) -> Result<()> {
    let state = graph
        .state(state_id)
        .ok_or_else(|| anyhow::anyhow!("State '{}' not found", state_id))?;

    println!("State: {}", state.id);
    println!("Type: {}", state.kind.name());
    match &state.kind {
        StateKind::Switch { expression } => println!("Expression: {}", expression),
        StateKind::View { interface, expose } => {
            println!("Interface: {}", interface);
            println!("Exposes: {}", expose.join(", "));
        }
        StateKind::Subflow { flow } => println!("Flow: {}", flow.join(" -> ")),
        StateKind::Invalid { reason, .. } => println!("Invalid: {}", reason),
        StateKind::Action => {}
    }

    let Some(edges) = graph.transitions_from(state_id) else {
        println!("\nNo transitions");
        return Ok(());
    };

    let mut selectors: Vec<&String> = edges.keys().collect();
    selectors.sort();

    println!("\nTransitions:");
    for selector in selectors {
        let entry = &edges[selector];
        let mut line = format!(
            "  {} -> {}",
            selector,
            entry.target.as_deref().unwrap_or("(continue sub-flow)")
        );
        if let Some(error_id) = &entry.error_id {
            line.push_str(&format!(" [error: {}]", error_id));
        }
        if !entry.context.is_empty() {
            line.push_str(&format!(" [context: {}]", serde_json::to_string(&entry.context)?));
        }
        println!("{}", line);
    }

    Ok(())
}
