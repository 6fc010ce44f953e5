//! Browser session facade.
//!
//! [`Browser`] owns the session manager handle and the page registry. The
//! session manager is injected after construction, mirroring how test
//! runners hand the driver to their contexts once it has been started.

use crate::Parameters;
use crate::error::{StepError, StepResult};
use crate::page::{Page, PageRegistry};
use anyhow::Result;

/// An active browser session.
pub trait Session {
    /// Reload the current document.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the request.
    fn reload(&mut self) -> Result<()>;

    /// Move one entry back in the session history.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the request.
    fn back(&mut self) -> Result<()>;

    /// Move one entry forward in the session history.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the request.
    fn forward(&mut self) -> Result<()>;
}

/// Hands out the session used by the current scenario.
pub trait SessionManager {
    /// Return the active session, starting it if required.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be started.
    fn session(&mut self) -> Result<&mut dyn Session>;
}

/// Facade over the session manager and page registry.
pub struct Browser {
    manager: Option<Box<dyn SessionManager>>,
    pages: Box<dyn PageRegistry>,
    parameters: Parameters,
}

impl Browser {
    /// Create a facade without a session manager.
    #[must_use]
    pub fn new(pages: Box<dyn PageRegistry>) -> Self {
        Self {
            manager: None,
            pages,
            parameters: Parameters::new(),
        }
    }

    /// Attach the session manager.
    pub fn set_session_manager(&mut self, manager: Box<dyn SessionManager>) {
        self.manager = Some(manager);
    }

    /// Builder-style variant of [`Self::set_session_manager`].
    #[must_use]
    pub fn with_session_manager(mut self, manager: Box<dyn SessionManager>) -> Self {
        self.set_session_manager(manager);
        self
    }

    /// Store browser parameters for later session construction.
    pub fn set_parameters(&mut self, parameters: Parameters) {
        self.parameters = parameters;
    }

    /// Borrow the stored browser parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Return the active session.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Uninitialised`] when no session manager has been
    /// attached, or the manager's own error when the session cannot start.
    pub fn session(&mut self) -> StepResult<&mut dyn Session> {
        let manager = self.manager.as_mut().ok_or(StepError::Uninitialised {
            component: "browser session manager",
        })?;
        Ok(manager.session()?)
    }

    /// Look up a page object by name.
    ///
    /// # Errors
    ///
    /// Propagates the registry error when the page is unknown.
    pub fn page(&self, name: &str) -> StepResult<Box<dyn Page>> {
        Ok(self.pages.page(name)?)
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("has_session_manager", &self.manager.is_some())
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
