//! Regex snippets for phrases without a step definition.
//!
//! Quoted strings become `"([^"]*)"` captures and bare integers become
//! `(\d+)`; everything else is escaped literally.

use crate::steps::StepKeyword;
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|\b\d+\b"#).ok());

/// Build an anchored regex pattern matching `text`.
///
/// # Examples
///
/// ```
/// use hexavel::snippet::pattern_for;
/// assert_eq!(pattern_for(r#"I have 3 "red" apples"#), r#"^I have (\d+) "([^"]*)" apples$"#);
/// ```
#[must_use]
pub fn pattern_for(text: &str) -> String {
    let mut pattern = String::from("^");
    let mut last = 0;
    if let Some(placeholder) = PLACEHOLDER.as_ref() {
        for found in placeholder.find_iter(text) {
            pattern.push_str(&regex::escape(text.get(last..found.start()).unwrap_or_default()));
            if found.as_str().starts_with('"') {
                pattern.push_str(r#""([^"]*)""#);
            } else {
                pattern.push_str(r"(\d+)");
            }
            last = found.end();
        }
    }
    pattern.push_str(&regex::escape(text.get(last..).unwrap_or_default()));
    pattern.push('$');
    pattern
}

/// Render a registration snippet for an undefined step.
#[must_use]
pub fn snippet_for(keyword: StepKeyword, text: &str) -> String {
    format!(
        "registry.register(StepKeyword::{keyword:?}, r#\"{}\"#, |ctx, args| {{ /* ... */ Ok(()) }})?;",
        pattern_for(text)
    )
}
