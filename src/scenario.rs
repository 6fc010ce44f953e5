//! Scenario execution: hooks first, then each step in order.

use crate::context::ScenarioContext;
use crate::error::StepError;
use crate::hooks::{HookList, TaskRunner};
use crate::steps::{Step, StepRegistry};
use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

/// A named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    steps: Vec<Step>,
}

impl Scenario {
    /// Create an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Scenario title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Why a scenario stopped.
#[derive(Debug, Error, Diagnostic)]
pub enum ScenarioFailure {
    /// A before-scenario hook failed; no step ran.
    #[error("scenario \"{scenario}\" could not start")]
    #[diagnostic(code(hexavel::scenario::hook))]
    Hook {
        /// Scenario title.
        scenario: String,
        /// Hook error.
        #[source]
        #[diagnostic_source]
        source: StepError,
    },

    /// A step failed; later steps were skipped.
    #[error("scenario \"{scenario}\" failed at step {number}: {text}")]
    #[diagnostic(code(hexavel::scenario::step))]
    Step {
        /// Scenario title.
        scenario: String,
        /// One-based position of the failing step.
        number: usize,
        /// The failing step as written.
        text: String,
        /// Step error.
        #[source]
        #[diagnostic_source]
        source: StepError,
    },
}

impl ScenarioFailure {
    /// Borrow the underlying step error.
    #[must_use]
    pub const fn step_error(&self) -> &StepError {
        match self {
            Self::Hook { source, .. } | Self::Step { source, .. } => source,
        }
    }
}

/// Outcome of running several scenarios.
#[derive(Debug, Default)]
pub struct SuiteSummary {
    /// Number of scenarios that passed.
    pub passed: usize,
    /// Failures in scenario order.
    pub failures: Vec<ScenarioFailure>,
}

impl SuiteSummary {
    /// Report whether every scenario passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs scenarios against a step registry, resetting shared state through
/// hooks before each one.
pub struct ScenarioRunner<W = ScenarioContext> {
    steps: StepRegistry<W>,
    hooks: HookList,
    tasks: Box<dyn TaskRunner>,
}

impl<W> ScenarioRunner<W> {
    /// Create a runner.
    #[must_use]
    pub fn new(steps: StepRegistry<W>, hooks: HookList, tasks: Box<dyn TaskRunner>) -> Self {
        Self {
            steps,
            hooks,
            tasks,
        }
    }

    /// Borrow the step registry.
    #[must_use]
    pub const fn steps(&self) -> &StepRegistry<W> {
        &self.steps
    }

    /// Run the hooks, then every step of `scenario` against `world`.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioFailure::Hook`] if a hook fails and
    /// [`ScenarioFailure::Step`] for the first failing step.
    pub fn run(&mut self, world: &mut W, scenario: &Scenario) -> Result<(), ScenarioFailure> {
        info!(scenario = scenario.name(), "running scenario");
        self.hooks
            .run_before_scenario(self.tasks.as_mut())
            .map_err(|err| ScenarioFailure::Hook {
                scenario: scenario.name.clone(),
                source: StepError::Collaborator(err),
            })?;
        for (index, step) in scenario.steps.iter().enumerate() {
            self.steps
                .dispatch(world, step)
                .map_err(|source| ScenarioFailure::Step {
                    scenario: scenario.name.clone(),
                    number: index + 1,
                    text: step.to_string(),
                    source,
                })?;
        }
        debug!(scenario = scenario.name(), "scenario passed");
        Ok(())
    }

    /// Run each scenario against a fresh world from `make_world`.
    ///
    /// A failure stops only its own scenario.
    pub fn run_all<F>(&mut self, scenarios: &[Scenario], mut make_world: F) -> SuiteSummary
    where
        F: FnMut() -> W,
    {
        let mut summary = SuiteSummary::default();
        for scenario in scenarios {
            let mut world = make_world();
            match self.run(&mut world, scenario) {
                Ok(()) => summary.passed += 1,
                Err(failure) => summary.failures.push(failure),
            }
        }
        summary
    }
}

impl<W> std::fmt::Debug for ScenarioRunner<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioRunner")
            .field("steps", &self.steps)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
