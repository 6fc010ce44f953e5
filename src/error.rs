//! Error types raised while dispatching steps.
//!
//! Only [`StepError::Expectation`] represents a failed assertion. Every other
//! variant describes why a step could not run at all. Errors raised by the
//! browser, page and resource collaborators pass through
//! [`StepError::Collaborator`] untouched so callers see the original message
//! and source chain.

use crate::expectation::ExpectationFailure;
use crate::table::TableError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while running a single step.
#[derive(Debug, Error, Diagnostic)]
pub enum StepError {
    /// An assertion step did not hold.
    #[error(transparent)]
    #[diagnostic(code(hexavel::step::expectation))]
    Expectation(#[from] ExpectationFailure),

    /// No registered pattern matches the phrase.
    #[error("undefined step: {text}")]
    #[diagnostic(
        code(hexavel::step::undefined),
        help("register a step definition such as:\n{snippet}")
    )]
    Undefined {
        /// The phrase that failed to match.
        text: String,
        /// Suggested regex pattern for a new definition.
        snippet: String,
    },

    /// A handler asked for a capture group its pattern does not define.
    #[error("step \"{step}\" has no argument named `{name}`")]
    #[diagnostic(code(hexavel::step::missing_argument))]
    MissingArgument {
        /// The phrase being dispatched.
        step: String,
        /// Name of the capture group.
        name: &'static str,
    },

    /// The phrase requires a table argument but none was supplied.
    #[error("step \"{step}\" requires a table argument")]
    #[diagnostic(code(hexavel::step::missing_table))]
    MissingTable {
        /// The phrase being dispatched.
        step: String,
    },

    /// A table argument could not be interpreted.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Table(#[from] TableError),

    /// A content or interaction step ran before any page was opened.
    #[error("no page has been opened in this scenario")]
    #[diagnostic(
        code(hexavel::step::no_current_page),
        help("open a page first, for example with `I am on \"Home\"`")
    )]
    NoCurrentPage,

    /// A collaborator was used before it was configured.
    #[error("{component} has not been initialised")]
    #[diagnostic(code(hexavel::step::uninitialised))]
    Uninitialised {
        /// Human-readable collaborator name.
        component: &'static str,
    },

    /// Resource data used as page parameters was not a mapping.
    #[error("resource \"{identifier}\" of type \"{resource_type}\" is not a parameter mapping")]
    #[diagnostic(code(hexavel::step::invalid_page_parameters))]
    InvalidPageParameters {
        /// Resource type consulted.
        resource_type: String,
        /// Resource identifier consulted.
        identifier: String,
    },

    /// Failure reported by a collaborator, propagated unchanged.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl StepError {
    /// Report whether this error is an assertion failure rather than an
    /// inability to run the step.
    #[must_use]
    pub const fn is_expectation(&self) -> bool {
        matches!(self, Self::Expectation(_))
    }
}

/// Result alias used by step handlers and context operations.
pub type StepResult<T = ()> = Result<T, StepError>;
