//! Layered configuration for scenario contexts.
//!
//! [`ContextConfig`] merges built-in defaults, an optional `hexavel`
//! configuration file and `HEXAVEL_*` environment variables through
//! `ortho_config`. The helpers turn the merged values into the settings,
//! task runner and fixture loader a suite needs.

use crate::context::ContextSettings;
use crate::hooks::{CommandTaskRunner, TaskError};
use crate::inflect::Inflector;
use crate::resource::{FixtureError, FixtureLoader};
use camino::Utf8Path;
use clap::Parser;
use miette::Diagnostic;
use ortho_config::declarative::LayerComposition;
use ortho_config::figment::{Figment, providers::Env};
use ortho_config::{
    ConfigDiscovery, MergeComposer, OrthoConfig, OrthoError, OrthoMergeExt, OrthoResult,
    sanitize_value,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const CONFIG_ENV_VAR: &str = "HEXAVEL_CONFIG_PATH";
const ENV_PREFIX: &str = "HEXAVEL_";

/// Settings shared by every scenario of a suite.
#[derive(Debug, Clone, PartialEq, Eq, Parser, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HEXAVEL")]
pub struct ContextConfig {
    /// Page opened by the homepage phrases.
    #[arg(long)]
    #[ortho_config(default = default_home_page())]
    pub home_page: String,

    /// Resource type consulted by `with the parameters "<id>"`.
    #[arg(long)]
    #[ortho_config(default = default_page_resource_type())]
    pub page_resource_type: String,

    /// Singularise type names in `there are multiple ... called:`.
    #[arg(long)]
    #[ortho_config(default = true)]
    pub support_plural: bool,

    /// Directory holding `<type>.yml` fixture files.
    #[arg(long)]
    pub fixtures_dir: Option<PathBuf>,

    /// Command line prefixed to lifecycle task names.
    #[arg(long)]
    #[ortho_config(default = default_task_command())]
    pub task_command: String,

    /// Seconds a lifecycle task may run before it is killed.
    #[arg(long)]
    #[ortho_config(default = DEFAULT_TASK_TIMEOUT_SECS)]
    pub task_timeout_secs: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    #[ortho_config(default = false)]
    pub verbose: bool,
}

const DEFAULT_TASK_TIMEOUT_SECS: u64 = 60;

fn default_home_page() -> String {
    String::from("Home")
}

fn default_page_resource_type() -> String {
    String::from("Page")
}

fn default_task_command() -> String {
    String::from("php artisan")
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            home_page: default_home_page(),
            page_resource_type: default_page_resource_type(),
            support_plural: true,
            fixtures_dir: None,
            task_command: default_task_command(),
            task_timeout_secs: DEFAULT_TASK_TIMEOUT_SECS,
            verbose: false,
        }
    }
}

/// Errors raised while loading or applying configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Layer discovery or merging failed.
    #[error("failed to load hexavel configuration")]
    #[diagnostic(code(hexavel::config::load))]
    Load {
        /// Underlying `ortho_config` error.
        #[source]
        source: Arc<OrthoError>,
    },

    /// The fixtures directory is not valid UTF-8.
    #[error("fixtures directory `{}` is not valid UTF-8", .path.display())]
    #[diagnostic(code(hexavel::config::non_utf8_path))]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },

    /// No fixtures directory is configured.
    #[error("no fixtures directory is configured")]
    #[diagnostic(
        code(hexavel::config::no_fixtures_dir),
        help("set `fixtures_dir` in the config file or HEXAVEL_FIXTURES_DIR")
    )]
    NoFixturesDir,

    /// The task command could not be turned into a runner.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Task(#[from] TaskError),

    /// The fixtures directory could not be opened.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fixture(#[from] FixtureError),
}

fn merge_layers() -> OrthoResult<ContextConfig> {
    let mut errors = Vec::new();
    let mut composer = MergeComposer::with_capacity(3);

    match sanitize_value(&ContextConfig::default()) {
        Ok(value) => composer.push_defaults(value),
        Err(err) => errors.push(err),
    }

    let discovery = ConfigDiscovery::builder("hexavel")
        .env_var(CONFIG_ENV_VAR)
        .build();
    let mut file_layers = discovery.compose_layers();
    errors.append(&mut file_layers.required_errors);
    if file_layers.value.is_empty() {
        errors.append(&mut file_layers.optional_errors);
    }
    for layer in file_layers.value {
        composer.push_layer(layer);
    }

    match Figment::from(Env::prefixed(ENV_PREFIX).split("__"))
        .extract::<serde_json::Value>()
        .into_ortho_merge()
    {
        Ok(value) => composer.push_environment(value),
        Err(err) => errors.push(err),
    }

    LayerComposition::new(composer.layers(), errors)
        .into_merge_result(ContextConfig::merge_from_layers)
}

impl ContextConfig {
    /// Load defaults, the discovered config file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if any layer fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        merge_layers().map_err(|source| ConfigError::Load { source })
    }

    /// Settings for a [`crate::ScenarioContext`].
    #[must_use]
    pub fn settings(&self) -> ContextSettings {
        ContextSettings {
            home_page: self.home_page.clone(),
            page_resource_type: self.page_resource_type.clone(),
            inflector: Inflector::new(self.support_plural),
        }
    }

    /// Install the tracing subscriber at the configured verbosity.
    pub fn init_logging(&self) {
        crate::logging::init(self.verbose);
    }

    /// The configured per-task timeout.
    #[must_use]
    pub const fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    /// Build the lifecycle task runner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Task`] if `task_command` is empty or badly
    /// quoted.
    pub fn task_runner(&self) -> Result<CommandTaskRunner, ConfigError> {
        Ok(CommandTaskRunner::from_command_line(&self.task_command)?
            .with_timeout(self.task_timeout()))
    }

    /// Open the configured fixtures directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoFixturesDir`] when unset,
    /// [`ConfigError::NonUtf8Path`] for non UTF-8 paths, or
    /// [`ConfigError::Fixture`] when the directory cannot be opened.
    pub fn fixture_loader(&self) -> Result<FixtureLoader, ConfigError> {
        let dir = self.fixtures_dir.as_ref().ok_or(ConfigError::NoFixturesDir)?;
        let utf8 = Utf8Path::from_path(dir).ok_or_else(|| ConfigError::NonUtf8Path {
            path: dir.clone(),
        })?;
        Ok(FixtureLoader::open(utf8)?)
    }
}
