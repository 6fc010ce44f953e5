//! Assertion helpers for page state.
//!
//! These are the only checks that construct failures themselves. Errors
//! raised by the page while answering are returned as collaborator errors.

use crate::error::StepResult;
use crate::page::Page;
use miette::Diagnostic;
use thiserror::Error;

/// A failed expectation with a message naming the expected value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
pub struct ExpectationFailure {
    message: String,
}

impl ExpectationFailure {
    /// Create a failure with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Borrow the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Assert that `page` reports itself open.
///
/// # Errors
///
/// Returns [`StepError::Expectation`](crate::StepError::Expectation) when
/// the page is not open, or the page's own error when the check itself
/// fails.
pub fn expect_open(page: &dyn Page, name: &str) -> StepResult {
    if page.is_open()? {
        Ok(())
    } else {
        Err(ExpectationFailure::new(format!("expected page \"{name}\" to be open")).into())
    }
}

/// Assert that `page` contains `text`.
///
/// # Errors
///
/// Returns [`StepError::Expectation`](crate::StepError::Expectation) when the text is absent.
pub fn expect_content(page: &dyn Page, text: &str) -> StepResult {
    if page.has_content(text)? {
        Ok(())
    } else {
        Err(ExpectationFailure::new(format!("expected page to have content \"{text}\"")).into())
    }
}

/// Assert that `page` does not contain `text`.
///
/// # Errors
///
/// Returns [`StepError::Expectation`](crate::StepError::Expectation) when the text is present.
pub fn expect_no_content(page: &dyn Page, text: &str) -> StepResult {
    if page.has_content(text)? {
        Err(ExpectationFailure::new(format!("expected page not to have content \"{text}\"")).into())
    } else {
        Ok(())
    }
}
