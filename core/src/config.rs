//! Configuration
//!
//! Layered with the `config` crate, lowest priority first:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, `ACCESSFLOW_CONFIG_PATH`, or `./accessflow.toml` if present)
//! 3. `ACCESSFLOW_*` environment variables, nested with `__`
//!    (e.g. `ACCESSFLOW_FLOW__ENTRY_STATE`); `.env` is loaded first
//! 4. Builder overrides
//!
//! Relative `flow.*_path` values are resolved against the directory of an
//! explicit config file; otherwise they are relative to the working directory.

use anyhow::{Context, Result};
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::interpreter::{DEFAULT_ENTRY_STATE, DEFAULT_MAX_ITERATIONS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub flow: FlowConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    pub states_path: PathBuf,
    pub transitions_path: PathBuf,
    pub entry_state: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from the default sources
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Programmatic overrides applied on top of file and environment sources
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    states_path: Option<PathBuf>,
    transitions_path: Option<PathBuf>,
    entry_state: Option<String>,
    log_level: Option<String>,
    skip_env: bool,
}

impl ConfigBuilder {
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn states_path(mut self, path: Option<PathBuf>) -> Self {
        self.states_path = path;
        self
    }

    pub fn transitions_path(mut self, path: Option<PathBuf>) -> Self {
        self.transitions_path = path;
        self
    }

    pub fn entry_state(mut self, entry: Option<String>) -> Self {
        self.entry_state = entry;
        self
    }

    pub fn log_level(mut self, level: Option<String>) -> Self {
        self.log_level = level;
        self
    }

    /// Ignore `.env`, `ACCESSFLOW_*` variables and `./accessflow.toml` (tests)
    pub fn skip_env(mut self, skip: bool) -> Self {
        self.skip_env = skip;
        self
    }

    pub fn build(self) -> Result<Config> {
        if !self.skip_env {
            dotenvy::dotenv().ok();
        }

        let mut builder = config::Config::builder()
            .set_default("flow.states_path", "flows/login/states.yaml")?
            .set_default("flow.transitions_path", "flows/login/transitions.yaml")?
            .set_default("flow.entry_state", DEFAULT_ENTRY_STATE)?
            .set_default("engine.max_iterations", DEFAULT_MAX_ITERATIONS as i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?;

        let config_path = self.config_path.clone().or_else(|| {
            if self.skip_env {
                None
            } else {
                std::env::var_os("ACCESSFLOW_CONFIG_PATH").map(PathBuf::from)
            }
        });

        builder = match &config_path {
            Some(path) => builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            ),
            None if self.skip_env => builder,
            None => builder.add_source(
                File::with_name("accessflow")
                    .format(FileFormat::Toml)
                    .required(false),
            ),
        };

        if !self.skip_env {
            builder = builder.add_source(
                Environment::with_prefix("ACCESSFLOW")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        if let Some(path) = &self.states_path {
            builder = builder.set_override("flow.states_path", path.to_string_lossy().as_ref())?;
        }
        if let Some(path) = &self.transitions_path {
            builder =
                builder.set_override("flow.transitions_path", path.to_string_lossy().as_ref())?;
        }
        if let Some(entry) = &self.entry_state {
            builder = builder.set_override("flow.entry_state", entry.as_str())?;
        }
        if let Some(level) = &self.log_level {
            builder = builder.set_override("logging.level", level.as_str())?;
        }

        let mut config: Config = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .context("Invalid accessflow configuration")?;

        if config.engine.max_iterations == 0 {
            anyhow::bail!("engine.max_iterations must be at least 1");
        }

        let base_dir = config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = base_dir {
            if self.states_path.is_none() {
                config.flow.states_path = resolve_from(dir, &config.flow.states_path);
            }
            if self.transitions_path.is_none() {
                config.flow.transitions_path = resolve_from(dir, &config.flow.transitions_path);
            }
        }

        Ok(config)
    }
}

fn resolve_from(dir: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        dir.join(path)
    } else {
        path.to_path_buf()
    }
}
