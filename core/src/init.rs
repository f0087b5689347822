//! Initialization for accessflow
//!
//! Loads configuration, installs the tracing subscriber and loads the flow
//! graph. Embedders that manage their own logging can turn the subscriber off.
//!
//! # Example
//!
//! ```no_run
//! use accessflow_core::init::InitBuilder;
//!
//! let app = InitBuilder::new()
//!     .states_path("flows/login/states.yaml")
//!     .transitions_path("flows/login/transitions.yaml")
//!     .init()?;
//! let engine = app.engine();
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat, LoggingConfig};
use crate::graph::{load_graph, FlowGraph};
use crate::interpreter::Engine;

/// Options for initializing accessflow
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Config file path (overrides default search)
    pub config_path: Option<PathBuf>,

    /// States document (overrides config)
    pub states_path: Option<PathBuf>,

    /// Transitions document (overrides config)
    pub transitions_path: Option<PathBuf>,

    /// Whether to install the global tracing subscriber
    pub install_logging: bool,

    /// Ignore `.env`, `ACCESSFLOW_*` variables and `./accessflow.toml`
    pub skip_env: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            states_path: None,
            transitions_path: None,
            install_logging: true,
            skip_env: false,
        }
    }
}

/// Builder for constructing InitOptions
pub struct InitBuilder {
    options: InitOptions,
}

impl InitBuilder {
    pub fn new() -> Self {
        Self {
            options: InitOptions::default(),
        }
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn states_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.states_path = Some(path.into());
        self
    }

    pub fn transitions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.transitions_path = Some(path.into());
        self
    }

    pub fn install_logging(mut self, install: bool) -> Self {
        self.options.install_logging = install;
        self
    }

    pub fn skip_env(mut self, skip: bool) -> Self {
        self.options.skip_env = skip;
        self
    }

    pub fn init(self) -> Result<Initialized> {
        initialize(self.options)
    }
}

impl Default for InitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Loaded configuration and flow graph
#[derive(Debug)]
pub struct Initialized {
    pub config: Config,
    pub graph: FlowGraph,
}

impl Initialized {
    /// Engine over the loaded graph with configured entry state and limits
    pub fn engine(&self) -> Engine<'_> {
        Engine::new(&self.graph)
            .entry_state(self.config.flow.entry_state.clone())
            .max_iterations(self.config.engine.max_iterations)
    }
}

/// Load configuration and the flow graph
pub fn initialize(options: InitOptions) -> Result<Initialized> {
    let config = Config::builder()
        .config_path(options.config_path)
        .states_path(options.states_path)
        .transitions_path(options.transitions_path)
        .skip_env(options.skip_env)
        .build()
        .context("Failed to load configuration")?;

    if options.install_logging {
        init_tracing(&config.logging);
    }

    let graph = load_graph(&config.flow.states_path, &config.flow.transitions_path)
        .context("Failed to load flow graph")?;

    info!(
        states = graph.state_count(),
        entry = %config.flow.entry_state,
        version = %&graph.version()[..8],
        "accessflow initialized"
    );

    Ok(Initialized { config, graph })
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level
///
/// Calling this more than once is a no-op.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
