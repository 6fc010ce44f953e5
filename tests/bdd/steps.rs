//! Step definitions that drive the built-in phrases.
//!
//! Each `the step ... is dispatched` line hands its phrase to the standard
//! registry and keeps the outcome for the following `Then` to inspect.

#![expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd step signatures take owned captures"
)]

use crate::bdd::fixtures::{TestWorld, strip_quotes};
use crate::support::FakeSite;
use anyhow::{Context, Result, anyhow, bail, ensure};
use camino::Utf8Path;
use hexavel::hooks::HookList;
use hexavel::resource::{ClassRegistry, FixtureLoader};
use rstest_bdd_macros::{given, then, when};
use hexavel::{Scenario, ScenarioContext, ScenarioRunner, Step, StepError, StepRegistry, Table};
use std::fs;
use tempfile::TempDir;

fn dispatch(world: &TestWorld, step: &Step) -> Result<()> {
    let registry_ref = world.registry.borrow();
    let registry = registry_ref
        .as_ref()
        .context("standard step definitions not loaded")?;
    let mut context_ref = world.context.borrow_mut();
    let context = context_ref.as_mut().context("no scenario context")?;
    let outcome = registry.dispatch(context, step);
    *world.outcome.borrow_mut() = Some(outcome);
    Ok(())
}

fn expect_failure(world: &TestWorld, matches: impl FnOnce(&StepError) -> bool) -> Result<()> {
    match world.take_outcome()? {
        Ok(()) => bail!("step succeeded unexpectedly"),
        Err(err) if matches(&err) => Ok(()),
        Err(err) => Err(anyhow!("step failed differently: {err:?}")),
    }
}

fn split_list(list: &str) -> Vec<&str> {
    strip_quotes(list)
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

#[given("a site with the page {page} showing {content}")]
fn site_with_page(world: &TestWorld, page: String, content: String) -> Result<()> {
    let site = FakeSite::new().with_page(strip_quotes(&page), strip_quotes(&content));
    *world.context.borrow_mut() = Some(site.context());
    world.site.set(site);
    Ok(())
}

#[given("a fixtures directory with widgets {first} and {second}")]
fn fixtures_directory(world: &TestWorld, first: String, second: String) -> Result<()> {
    let dir = TempDir::new().context("create fixtures directory")?;
    let yaml = format!(
        "{first}:\n  colour: {first}\n{second}:\n  colour: {second}\n",
        first = strip_quotes(&first),
        second = strip_quotes(&second),
    );
    fs::write(dir.path().join("widget.yml"), yaml).context("write widget fixtures")?;
    let path = Utf8Path::from_path(dir.path()).context("fixtures path is not UTF-8")?;
    let loader = FixtureLoader::open(path)?;
    let site = FakeSite::new();
    let resources = site.resources_with(
        loader,
        ClassRegistry::new().with("widget", "App\\Models\\Widget"),
    );
    *world.context.borrow_mut() = Some(ScenarioContext::new(site.browser(), resources));
    world.site.set(site);
    *world.fixtures_dir.borrow_mut() = Some(dir);
    Ok(())
}

#[given("the standard step definitions")]
fn standard_steps(world: &TestWorld) -> Result<()> {
    *world.registry.borrow_mut() = Some(StepRegistry::standard()?);
    Ok(())
}

#[given("a scenario runner with the standard hooks")]
fn scenario_runner(world: &TestWorld) -> Result<()> {
    let runner = ScenarioRunner::new(
        StepRegistry::standard()?,
        HookList::standard(),
        Box::new(world.tasks.clone()),
    );
    *world.runner.borrow_mut() = Some(runner);
    Ok(())
}

#[when("the step {phrase} is dispatched")]
fn step_is_dispatched(world: &TestWorld, phrase: String) -> Result<()> {
    dispatch(world, &Step::when(phrase.as_str()))
}

#[when("the step {phrase} is dispatched with the names {names}")]
fn step_is_dispatched_with_names(world: &TestWorld, phrase: String, names: String) -> Result<()> {
    let mut rows = vec![vec!["name".to_owned()]];
    rows.extend(split_list(&names).into_iter().map(|name| vec![name.to_owned()]));
    dispatch(world, &Step::given(phrase.as_str()).with_table(Table::new(rows)))
}

#[when("a scenario with the step {phrase} is run")]
fn scenario_is_run(world: &TestWorld, phrase: String) -> Result<()> {
    let scenario = Scenario::new("bdd").step(Step::given(phrase.as_str()));
    let mut runner_ref = world.runner.borrow_mut();
    let runner = runner_ref.as_mut().context("no scenario runner")?;
    let mut context_ref = world.context.borrow_mut();
    let context = context_ref.as_mut().context("no scenario context")?;
    let outcome = runner.run(context, &scenario);
    *world.scenario_outcome.borrow_mut() = Some(outcome);
    Ok(())
}

#[then("the step succeeds")]
fn step_succeeds(world: &TestWorld) -> Result<()> {
    world
        .take_outcome()?
        .map_err(|err| anyhow!("step failed: {err:?}"))
}

#[then("the step fails with an expectation failure")]
fn step_fails_expectation(world: &TestWorld) -> Result<()> {
    expect_failure(world, StepError::is_expectation)
}

#[then("the step fails because no page is open")]
fn step_fails_no_page(world: &TestWorld) -> Result<()> {
    expect_failure(world, |err| matches!(err, StepError::NoCurrentPage))
}

#[then("the step fails with a collaborator error")]
fn step_fails_collaborator(world: &TestWorld) -> Result<()> {
    expect_failure(world, |err| matches!(err, StepError::Collaborator(_)))
}

#[then("the step is undefined")]
fn step_is_undefined(world: &TestWorld) -> Result<()> {
    expect_failure(world, |err| matches!(err, StepError::Undefined { .. }))
}

#[then("the browser shows {page}")]
fn browser_shows(world: &TestWorld, page: String) -> Result<()> {
    let site = world.site()?;
    let shown = site.log().shown.clone();
    ensure!(
        shown.as_deref() == Some(strip_quotes(&page)),
        "browser shows {shown:?}, expected {page}"
    );
    Ok(())
}

#[then("the persisted resources are {records}")]
fn persisted_resources(world: &TestWorld, records: String) -> Result<()> {
    let persisted = world.site()?.persisted();
    let expected = split_list(&records);
    ensure!(
        persisted == expected,
        "persisted {persisted:?}, expected {expected:?}"
    );
    Ok(())
}

#[then("the scenario passes")]
fn scenario_passes(world: &TestWorld) -> Result<()> {
    world
        .scenario_outcome
        .borrow_mut()
        .take()
        .context("no scenario has run")?
        .map_err(|err| anyhow!("scenario failed: {err}"))
}

#[then("the recorded tasks are {tasks}")]
fn recorded_tasks(world: &TestWorld, tasks: String) -> Result<()> {
    let recorded = world.tasks.tasks();
    let expected = split_list(&tasks);
    ensure!(
        recorded == expected,
        "tasks {recorded:?}, expected {expected:?}"
    );
    Ok(())
}
