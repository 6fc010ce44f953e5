//! Built-in phrases dispatched through the standard registry.

mod support;

use hexavel::{Step, StepError, StepRegistry, Table};
use rstest::{fixture, rstest};
use serde_json::json;
use support::FakeSite;

#[fixture]
fn registry() -> StepRegistry {
    StepRegistry::standard().expect("built-in patterns compile")
}

#[fixture]
fn site() -> FakeSite {
    FakeSite::new()
        .with_page("Home", "Welcome, User")
        .with_page("Search Results", "Say \"hi\" to everyone")
        .with_fixture("Page", "launch", json!({ "campaign": "spring" }))
        .with_fixture("product", "mug", json!({ "price": 4 }))
        .with_fixture("product", "cap", json!({ "price": 9 }))
}

fn run(registry: &StepRegistry, site: &FakeSite, steps: &[Step]) -> Vec<String> {
    let mut ctx = site.context();
    for step in steps {
        registry
            .dispatch(&mut ctx, step)
            .unwrap_or_else(|err| panic!("step `{step}` failed: {err:?}"));
    }
    site.events()
}

#[rstest]
#[case("I am on the homepage")]
#[case("am on homepage")]
#[case("I go to the homepage")]
#[case("go to homepage")]
fn homepage_phrases_open_home(registry: StepRegistry, site: FakeSite, #[case] phrase: &str) {
    let events = run(&registry, &site, &[Step::given(phrase)]);
    assert_eq!(events, ["open Home"]);
}

#[rstest]
#[case(r#"I am on "Search Results""#)]
#[case(r#"I go to "Search Results""#)]
#[case(r#"am on "Search Results""#)]
fn page_phrases_capture_the_page_name(
    registry: StepRegistry,
    site: FakeSite,
    #[case] phrase: &str,
) {
    let events = run(&registry, &site, &[Step::given(phrase)]);
    assert_eq!(events, ["open Search Results"]);
}

#[rstest]
#[case(r#"I am on "Home" with the parameters:"#)]
#[case(r#"I go to "Home" with the parameters:"#)]
fn parameter_tables_are_cast(registry: StepRegistry, site: FakeSite, #[case] phrase: &str) {
    let table = Table::from_rows(&[&["parameter", "value"], &["q", "1"], &["page", "3"], &["q", "2"]]);
    run(&registry, &site, &[Step::given(phrase).with_table(table)]);
    let log = site.log();
    let (_, parameters) = log.opened.first().expect("page opened");
    assert_eq!(
        serde_json::Value::Object(parameters.clone()),
        json!({ "q": "2", "page": "3" })
    );
    let keys: Vec<&String> = parameters.keys().collect();
    assert_eq!(keys, ["q", "page"]);
}

#[rstest]
fn parameter_phrase_without_table_fails(registry: StepRegistry, site: FakeSite) {
    let mut ctx = site.context();
    let err = registry
        .dispatch(&mut ctx, &Step::given(r#"I am on "Home" with the parameters:"#))
        .expect_err("table required");
    assert!(matches!(err, StepError::MissingTable { .. }));
}

#[rstest]
#[case(r#"I am on "Home" with the parameters "launch""#)]
#[case(r#"I go to "Home" with the parameters "launch""#)]
fn resource_parameters_are_loaded(registry: StepRegistry, site: FakeSite, #[case] phrase: &str) {
    let events = run(&registry, &site, &[Step::given(phrase)]);
    assert_eq!(events, ["load Page/launch", "open Home"]);
    assert_eq!(site.log().opened[0].1["campaign"], "spring");
}

#[rstest]
fn assertion_phrases_check_the_current_page(registry: StepRegistry, site: FakeSite) {
    run(
        &registry,
        &site,
        &[
            Step::given("I am on the homepage"),
            Step::then("I should be on the homepage"),
            Step::then(r#"I should be on "Home""#),
            Step::then(r#"I should see "Welcome""#),
            Step::then(r#"I should not see "Goodbye""#),
        ],
    );
}

#[rstest]
fn escaped_quotes_reach_the_page(registry: StepRegistry, site: FakeSite) {
    run(
        &registry,
        &site,
        &[
            Step::given(r#"I am on "Search Results""#),
            Step::then(r#"I should see "Say \"hi\"""#),
        ],
    );
}

#[rstest]
fn failed_assertion_is_an_expectation(registry: StepRegistry, site: FakeSite) {
    let mut ctx = site.context();
    registry
        .dispatch(&mut ctx, &Step::given("I am on the homepage"))
        .expect("visit");
    let err = registry
        .dispatch(&mut ctx, &Step::then(r#"I should not see "Welcome""#))
        .expect_err("content is present");
    assert!(err.is_expectation());
}

#[rstest]
#[case(r#"I follow "Sign in""#, "click Sign in")]
#[case(r#"follow "Sign in""#, "click Sign in")]
#[case(r#"I press "Save \"draft\"""#, r#"press Save "draft""#)]
fn interaction_phrases_capture_locators(
    registry: StepRegistry,
    site: FakeSite,
    #[case] phrase: &str,
    #[case] event: &str,
) {
    let events = run(
        &registry,
        &site,
        &[Step::given("I am on the homepage"), Step::when(phrase)],
    );
    assert_eq!(events, ["open Home", event]);
}

#[rstest]
#[case("I reload the page", "reload")]
#[case("I move backward one page", "back")]
#[case("move forward one page", "forward")]
fn history_phrases(
    registry: StepRegistry,
    site: FakeSite,
    #[case] phrase: &str,
    #[case] event: &str,
) {
    assert_eq!(run(&registry, &site, &[Step::when(phrase)]), [event]);
}

#[rstest]
#[case(r#"there is a product called "mug""#)]
#[case(r#"I have a product called "mug""#)]
#[case(r#"I own a product called "mug""#)]
#[case(r#"I am a product called "mug""#)]
fn single_resource_phrases(registry: StepRegistry, site: FakeSite, #[case] phrase: &str) {
    let events = run(&registry, &site, &[Step::given(phrase)]);
    assert_eq!(events, ["load product/mug", "persist product/mug"]);
}

#[rstest]
fn multiple_resource_phrase_singularises(registry: StepRegistry, site: FakeSite) {
    let table = Table::from_rows(&[&["name"], &["mug"], &["cap"]]);
    let events = run(
        &registry,
        &site,
        &[Step::given("there are multiple products called:").with_table(table)],
    );
    assert_eq!(
        events,
        [
            "load product/mug",
            "persist product/mug",
            "load product/cap",
            "persist product/cap",
        ]
    );
}

#[rstest]
fn undefined_phrase_suggests_a_pattern(registry: StepRegistry, site: FakeSite) {
    let mut ctx = site.context();
    let err = registry
        .dispatch(&mut ctx, &Step::when(r#"I juggle 3 "balls""#))
        .expect_err("no such phrase");
    let StepError::Undefined { snippet, .. } = err else {
        panic!("expected an undefined step");
    };
    assert!(
        snippet.contains(r##"r#"^I juggle (\d+) "([^"]*)"$"#"##),
        "{snippet}"
    );
    assert!(site.events().is_empty());
}

#[rstest]
fn registry_lists_every_phrase(registry: StepRegistry) {
    assert_eq!(registry.len(), 19);
    assert!(
        registry
            .definitions()
            .all(|definition| definition.pattern().starts_with('^'))
    );
}
