//! Pre-scenario lifecycle hooks.
//!
//! Each hook asks an external [`TaskRunner`] to reset shared state before a
//! scenario starts. Hooks are independent and run in the order they were
//! registered; the first failure aborts the scenario.

mod command;

pub use command::{CommandTaskRunner, DEFAULT_TASK_TIMEOUT, TaskError};

use anyhow::{Context, Result};
use tracing::debug;

/// Task name used to clear the application cache.
pub const CACHE_CLEAR_TASK: &str = "cache:clear";
/// Task name used to roll back every migration.
pub const MIGRATE_RESET_TASK: &str = "migrate:reset";
/// Task name used to run migrations.
pub const MIGRATE_TASK: &str = "migrate";

/// Invokes named maintenance tasks.
pub trait TaskRunner {
    /// Run `task` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be run or reports failure.
    fn call(&mut self, task: &str) -> Result<()>;
}

/// A hook run before each scenario.
pub trait ScenarioHook {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Run the hook.
    ///
    /// # Errors
    ///
    /// Returns the task runner's error.
    fn before_scenario(&self, runner: &mut dyn TaskRunner) -> Result<()>;
}

/// Clears the application cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheReset;

impl ScenarioHook for CacheReset {
    fn name(&self) -> &str {
        "cache reset"
    }

    fn before_scenario(&self, runner: &mut dyn TaskRunner) -> Result<()> {
        runner.call(CACHE_CLEAR_TASK)
    }
}

/// Rolls back and re-runs every migration so the schema starts empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatabaseReset;

impl ScenarioHook for DatabaseReset {
    fn name(&self) -> &str {
        "database reset"
    }

    fn before_scenario(&self, runner: &mut dyn TaskRunner) -> Result<()> {
        runner.call(MIGRATE_RESET_TASK)?;
        runner.call(MIGRATE_TASK)
    }
}

/// Ordered collection of scenario hooks.
#[derive(Default)]
pub struct HookList {
    hooks: Vec<Box<dyn ScenarioHook>>,
}

impl HookList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache reset followed by the database reset.
    #[must_use]
    pub fn standard() -> Self {
        Self::new().with(CacheReset).with(DatabaseReset)
    }

    /// Append a hook.
    pub fn register(&mut self, hook: impl ScenarioHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Builder-style variant of [`Self::register`].
    #[must_use]
    pub fn with(mut self, hook: impl ScenarioHook + 'static) -> Self {
        self.register(hook);
        self
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Report whether no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in registration order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the failing hook's error, annotated with the hook name.
    pub fn run_before_scenario(&self, runner: &mut dyn TaskRunner) -> Result<()> {
        for hook in &self.hooks {
            debug!(hook = hook.name(), "running before-scenario hook");
            hook.before_scenario(runner)
                .with_context(|| format!("{} hook failed", hook.name()))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}
