//! Phrase dispatch.
//!
//! A [`StepRegistry`] is an ordered table of compiled patterns, each bound to
//! a handler. Dispatching a [`Step`] tries the patterns in registration order
//! and runs the first handler whose pattern matches. The Gherkin keyword the
//! step was written with does not take part in matching.

mod definitions;

pub use definitions::register_standard_steps;

use crate::context::ScenarioContext;
use crate::error::{StepError, StepResult};
use crate::snippet::snippet_for;
use crate::table::Table;
use miette::Diagnostic;
use regex::{Captures, Regex};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Gherkin keyword a step or definition is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Establishes context.
    Given,
    /// Performs an action.
    When,
    /// Checks an outcome.
    Then,
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
        };
        f.write_str(word)
    }
}

/// A phrase to dispatch, with its optional table argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Keyword the phrase was written with.
    pub keyword: StepKeyword,
    /// Phrase text without the keyword.
    pub text: String,
    /// Table attached to the phrase, if any.
    pub table: Option<Table>,
}

impl Step {
    /// Create a step without a table.
    #[must_use]
    pub fn new(keyword: StepKeyword, text: impl Into<String>) -> Self {
        Self {
            keyword,
            text: text.into(),
            table: None,
        }
    }

    /// Shorthand for a `Given` step.
    #[must_use]
    pub fn given(text: impl Into<String>) -> Self {
        Self::new(StepKeyword::Given, text)
    }

    /// Shorthand for a `When` step.
    #[must_use]
    pub fn when(text: impl Into<String>) -> Self {
        Self::new(StepKeyword::When, text)
    }

    /// Shorthand for a `Then` step.
    #[must_use]
    pub fn then(text: impl Into<String>) -> Self {
        Self::new(StepKeyword::Then, text)
    }

    /// Attach a table argument.
    #[must_use]
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword, self.text)
    }
}

/// Arguments captured from a matched phrase.
#[derive(Debug)]
pub struct StepArgs<'a> {
    text: &'a str,
    captures: Captures<'a>,
    table: Option<&'a Table>,
}

impl<'a> StepArgs<'a> {
    /// The phrase that matched.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Return the named capture with `\"` unescaped to `"`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MissingArgument`] when the pattern has no such
    /// group or the group did not participate in the match.
    pub fn get(&self, name: &'static str) -> StepResult<String> {
        self.captures
            .name(name)
            .map(|found| unescape(found.as_str()))
            .ok_or_else(|| StepError::MissingArgument {
                step: self.text.to_owned(),
                name,
            })
    }

    /// Return the table attached to the step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::MissingTable`] when the step has no table.
    pub fn table(&self) -> StepResult<&'a Table> {
        self.table.ok_or_else(|| StepError::MissingTable {
            step: self.text.to_owned(),
        })
    }
}

fn unescape(value: &str) -> String {
    value.replace("\\\"", "\"")
}

/// Raised when a definition's pattern does not compile.
#[derive(Debug, Error, Diagnostic)]
#[error("invalid step pattern `{pattern}`")]
#[diagnostic(code(hexavel::step::invalid_pattern))]
pub struct PatternError {
    pattern: String,
    #[source]
    source: regex::Error,
}

type Handler<W> = Box<dyn Fn(&mut W, &StepArgs<'_>) -> StepResult>;

/// A pattern bound to its handler.
pub struct StepDefinition<W> {
    keyword: StepKeyword,
    pattern: Regex,
    handler: Handler<W>,
}

impl<W> StepDefinition<W> {
    /// Keyword the definition was registered under.
    #[must_use]
    pub const fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Source text of the pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl<W> fmt::Debug for StepDefinition<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("keyword", &self.keyword)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Ordered table of step definitions over a world of type `W`.
pub struct StepRegistry<W = ScenarioContext> {
    definitions: Vec<StepDefinition<W>>,
}

impl<W> StepRegistry<W> {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Compile `pattern` and append it with `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is not a valid regex.
    pub fn register<F>(
        &mut self,
        keyword: StepKeyword,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, PatternError>
    where
        F: Fn(&mut W, &StepArgs<'_>) -> StepResult + 'static,
    {
        let compiled = Regex::new(pattern).map_err(|source| PatternError {
            pattern: pattern.to_owned(),
            source,
        })?;
        self.definitions.push(StepDefinition {
            keyword,
            pattern: compiled,
            handler: Box::new(handler),
        });
        Ok(self)
    }

    /// Iterate over definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &StepDefinition<W>> {
        self.definitions.iter()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Report whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Find the first definition matching `text`.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<(&StepDefinition<W>, Captures<'t>)> {
        self.definitions.iter().find_map(|definition| {
            definition
                .pattern
                .captures(text)
                .map(|captures| (definition, captures))
        })
    }

    /// Run the handler of the first definition matching `step`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Undefined`] with a suggested pattern when nothing
    /// matches, otherwise whatever the handler returns.
    pub fn dispatch(&self, world: &mut W, step: &Step) -> StepResult {
        let Some((definition, captures)) = self.find(&step.text) else {
            return Err(StepError::Undefined {
                text: step.text.clone(),
                snippet: snippet_for(step.keyword, &step.text),
            });
        };
        debug!(
            step = %step,
            pattern = definition.pattern(),
            "dispatching step"
        );
        let args = StepArgs {
            text: &step.text,
            captures,
            table: step.table.as_ref(),
        };
        (definition.handler)(world, &args)
    }
}

impl StepRegistry<ScenarioContext> {
    /// A registry holding every built-in browser and resource phrase.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if a built-in pattern fails to compile.
    pub fn standard() -> Result<Self, PatternError> {
        let mut registry = Self::new();
        register_standard_steps(&mut registry)?;
        Ok(registry)
    }
}

impl<W> Default for StepRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for StepRegistry<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.definitions).finish()
    }
}
