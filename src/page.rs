//! Page-object collaborator traits.
//!
//! A page object is a named abstraction over one screen. The registry that
//! resolves names to page objects belongs to the hosting test suite; this
//! crate only sequences calls against it.

use crate::Parameters;
use anyhow::Result;

/// One logical screen driven through the browser session.
pub trait Page {
    /// Navigate to the page, substituting `parameters` into its location.
    ///
    /// # Errors
    ///
    /// Returns an error if navigation fails.
    fn open(&mut self, parameters: &Parameters) -> Result<()>;

    /// Report whether the browser currently shows this page.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be queried.
    fn is_open(&self) -> Result<bool>;

    /// Report whether the page contains the literal `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be queried.
    fn has_content(&self, text: &str) -> Result<bool>;

    /// Click a link matched by id, title, alt text or text.
    ///
    /// # Errors
    ///
    /// Returns an error if no link matches or the click fails.
    fn click_link(&mut self, locator: &str) -> Result<()>;

    /// Press a button matched by id, name, title, alt text or value.
    ///
    /// # Errors
    ///
    /// Returns an error if no button matches or the press fails.
    fn press_button(&mut self, locator: &str) -> Result<()>;
}

/// Resolves logical page names to page objects.
pub trait PageRegistry {
    /// Return the page object registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is registered under that name.
    fn page(&self, name: &str) -> Result<Box<dyn Page>>;
}
