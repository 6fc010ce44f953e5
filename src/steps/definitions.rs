//! Built-in browser and resource phrases.

use super::{PatternError, StepArgs, StepKeyword, StepRegistry};
use crate::Parameters;
use crate::context::ScenarioContext;
use crate::error::StepResult;
use crate::table::cast_parameters_table;

const PAGE: &str = r#""(?P<page>[^"]+)""#;

fn visit_homepage(ctx: &mut ScenarioContext, _: &StepArgs<'_>) -> StepResult {
    ctx.visit_homepage().map(drop)
}

fn assert_homepage(ctx: &mut ScenarioContext, _: &StepArgs<'_>) -> StepResult {
    ctx.assert_homepage()
}

fn visit(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.visit(&args.get("page")?, &Parameters::new()).map(drop)
}

fn visit_with_parameters(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    let parameters = cast_parameters_table(args.table()?)?;
    ctx.visit(&args.get("page")?, &parameters).map(drop)
}

fn visit_with_resource(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    let identifier = args.get("parametersIdentifier")?;
    ctx.visit_with_resource(&args.get("page")?, &identifier).map(drop)
}

fn seeing(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.seeing(&args.get("page")?)
}

fn should_see(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.assert_page_contains_text(&args.get("text")?)
}

fn should_not_see(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.assert_page_not_contains_text(&args.get("text")?)
}

fn follow(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.click_link(&args.get("link")?)
}

fn press(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.press_button(&args.get("button")?)
}

fn resource_called(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.there_is_a_resource_called(&args.get("resource")?, &args.get("name")?)
        .map(drop)
}

fn resources_called(ctx: &mut ScenarioContext, args: &StepArgs<'_>) -> StepResult {
    ctx.there_are_multiple_resources_called(&args.get("resource")?, args.table()?)
        .map(drop)
}

fn reload(ctx: &mut ScenarioContext, _: &StepArgs<'_>) -> StepResult {
    ctx.reload()
}

fn back(ctx: &mut ScenarioContext, _: &StepArgs<'_>) -> StepResult {
    ctx.back()
}

fn forward(ctx: &mut ScenarioContext, _: &StepArgs<'_>) -> StepResult {
    ctx.forward()
}

/// Append every built-in phrase to `registry`.
///
/// Homepage phrases are registered ahead of the quoted page phrases, and the
/// table variants of `I am on` follow the plain ones. Users may register
/// their own definitions before or after these.
///
/// # Errors
///
/// Returns [`PatternError`] if a pattern fails to compile.
pub fn register_standard_steps(
    registry: &mut StepRegistry<ScenarioContext>,
) -> Result<(), PatternError> {
    use StepKeyword::{Given, Then, When};

    registry
        .register(Given, r"^(?:|I )am on (?:|the )homepage$", visit_homepage)?
        .register(When, r"^(?:|I )go to (?:|the )homepage$", visit_homepage)?
        .register(Then, r"^(?:|I )should be on (?:|the )homepage$", assert_homepage)?
        .register(Given, &format!("^(?:|I )am on {PAGE}$"), visit)?
        .register(When, &format!("^(?:|I )go to {PAGE}$"), visit)?
        .register(
            Given,
            &format!("^(?:|I )am on {PAGE} with the parameters:$"),
            visit_with_parameters,
        )?
        .register(
            When,
            &format!("^(?:|I )go to {PAGE} with the parameters:$"),
            visit_with_parameters,
        )?
        .register(
            Given,
            &format!(
                r#"^(?:|I )(am on|go to) {PAGE} with the parameters "(?P<parametersIdentifier>[^"]+)"$"#
            ),
            visit_with_resource,
        )?
        .register(Then, &format!("^(?:|I )should be on {PAGE}$"), seeing)?
        .register(Then, r#"^(?:|I )should see "(?P<text>(?:[^"]|\\")*)"$"#, should_see)?
        .register(
            Then,
            r#"^(?:|I )should not see "(?P<text>(?:[^"]|\\")*)"$"#,
            should_not_see,
        )?
        .register(When, r#"^(?:|I )follow "(?P<link>(?:[^"]|\\")*)"$"#, follow)?
        .register(When, r#"^(?:|I )press "(?P<button>(?:[^"]|\\")*)"$"#, press)?
        .register(
            Given,
            r#"^there is a (?P<resource>[^"]*) called "(?P<name>[^"]*)"$"#,
            resource_called,
        )?
        .register(
            Given,
            r#"^I (?: |have |own |am )a (?P<resource>[^"]*) called "(?P<name>[^"]*)"$"#,
            resource_called,
        )?
        .register(
            Given,
            r#"^there are multiple (?P<resource>[^"]*) called:$"#,
            resources_called,
        )?
        .register(When, r"^(?:|I )reload the page$", reload)?
        .register(When, r"^(?:|I )move backward one page$", back)?
        .register(When, r"^(?:|I )move forward one page$", forward)?;
    Ok(())
}
