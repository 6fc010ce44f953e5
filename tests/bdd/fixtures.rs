//! World state shared by the BDD steps.
//!
//! Non-Clone values live in `RefCell<Option<T>>`; the fake site is cheap to
//! clone and sits in a `Slot`.

// The `#[fixture]` macro generates items that cannot have doc comments attached
#![allow(
    missing_docs,
    reason = "Generated fixture types cannot have doc comments attached"
)]

use crate::support::FakeSite;
use anyhow::{Context, Result};
use hexavel::hooks::TaskRunner;
use hexavel::{ScenarioContext, ScenarioFailure, ScenarioRunner, StepRegistry, StepResult};
use rstest::fixture;
use rstest_bdd::Slot;
use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;

/// Task runner that records task names instead of spawning processes.
#[derive(Debug, Clone, Default)]
pub struct RecordingTasks {
    tasks: Rc<RefCell<Vec<String>>>,
}

impl RecordingTasks {
    /// Tasks called so far.
    pub fn tasks(&self) -> Vec<String> {
        self.tasks.borrow().clone()
    }
}

impl TaskRunner for RecordingTasks {
    fn call(&mut self, task: &str) -> Result<()> {
        self.tasks.borrow_mut().push(task.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub struct TestWorld {
    pub site: Slot<FakeSite>,
    pub context: RefCell<Option<ScenarioContext>>,
    pub registry: RefCell<Option<StepRegistry>>,
    pub outcome: RefCell<Option<StepResult>>,
    pub fixtures_dir: RefCell<Option<TempDir>>,
    pub tasks: RecordingTasks,
    pub runner: RefCell<Option<ScenarioRunner>>,
    pub scenario_outcome: RefCell<Option<Result<(), ScenarioFailure>>>,
}

impl TestWorld {
    /// The site configured by a `Given` step.
    pub fn site(&self) -> Result<FakeSite> {
        self.site.get().context("no site configured")
    }

    /// Take the outcome of the last dispatched step.
    pub fn take_outcome(&self) -> Result<StepResult> {
        self.outcome
            .borrow_mut()
            .take()
            .context("no step has been dispatched")
    }
}

#[fixture]
pub fn world() -> TestWorld {
    TestWorld::default()
}

/// Strip surrounding double or single quotes from a step parameter.
///
/// rstest-bdd captures quoted strings including the quotes.
#[must_use]
pub fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|stripped| stripped.strip_suffix('"'))
        .or_else(|| {
            s.strip_prefix('\'')
                .and_then(|stripped| stripped.strip_suffix('\''))
        })
        .unwrap_or(s)
}
