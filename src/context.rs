//! Scenario-scoped state passed to every step handler.
//!
//! A [`ScenarioContext`] owns the browser facade, the resource contract and
//! the current page. The current page is replaced on every successful
//! navigation and is the implicit subject of the content and interaction
//! operations. A fresh context is built for each scenario.

use crate::Parameters;
use crate::error::{StepError, StepResult};
use crate::expectation::{expect_content, expect_no_content, expect_open};
use crate::inflect::Inflector;
use crate::page::Page;
use crate::resource::{ResourceObject, Resources};
use crate::session::Browser;
use crate::table::{NAME_COLUMN, Table};
use serde_json::Value;
use tracing::debug;

/// Tunables consulted by the context operations.
#[derive(Debug, Clone)]
pub struct ContextSettings {
    /// Page opened by the homepage phrases.
    pub home_page: String,
    /// Resource type whose data supplies page parameters.
    pub page_resource_type: String,
    /// Singulariser applied to type names in the multi-resource phrase.
    pub inflector: Inflector,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            home_page: "Home".to_owned(),
            page_resource_type: "Page".to_owned(),
            inflector: Inflector::default(),
        }
    }
}

/// State shared by the steps of one scenario.
pub struct ScenarioContext {
    settings: ContextSettings,
    browser: Browser,
    resources: Resources,
    current_page: Option<Box<dyn Page>>,
}

impl ScenarioContext {
    /// Create a context with default settings.
    #[must_use]
    pub fn new(browser: Browser, resources: Resources) -> Self {
        Self {
            settings: ContextSettings::default(),
            browser,
            resources,
            current_page: None,
        }
    }

    /// Replace the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ContextSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Borrow the settings.
    #[must_use]
    pub const fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Borrow the browser facade.
    #[must_use]
    pub const fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Mutably borrow the browser facade.
    pub const fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Borrow the resource contract.
    #[must_use]
    pub const fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Mutably borrow the resource contract.
    pub const fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Look up `name`, open it with `parameters` and make it the current
    /// page, then check that it reports itself open.
    ///
    /// The current page is replaced before the check, so a failed check
    /// still leaves the newly opened page current.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Expectation`] if the page is not open after
    /// navigation, or the collaborator's error if lookup or navigation fails.
    pub fn open_page(&mut self, name: &str, parameters: &Parameters) -> StepResult<&dyn Page> {
        debug!(page = name, "opening page");
        let mut page = self.browser.page(name)?;
        page.open(parameters)?;
        let current = self.current_page.insert(page);
        expect_open(&**current, name)?;
        Ok(&**current)
    }

    /// Open the configured home page.
    ///
    /// # Errors
    ///
    /// See [`Self::open_page`].
    pub fn visit_homepage(&mut self) -> StepResult<&dyn Page> {
        let home = self.settings.home_page.clone();
        self.open_page(&home, &Parameters::new())
    }

    /// Check that the home page is open without changing the current page.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Expectation`] if the home page is not open.
    pub fn assert_homepage(&self) -> StepResult {
        self.seeing(&self.settings.home_page)
    }

    /// Open `page` with explicit parameters.
    ///
    /// # Errors
    ///
    /// See [`Self::open_page`].
    pub fn visit(&mut self, page: &str, parameters: &Parameters) -> StepResult<&dyn Page> {
        self.open_page(page, parameters)
    }

    /// Open `page` using the data of the page resource `identifier` as its
    /// parameters. The resource is loaded once, before navigation.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InvalidPageParameters`] when the resource data is
    /// not a mapping, the resource contract's error when loading fails, or
    /// any error from [`Self::open_page`].
    pub fn visit_with_resource(&mut self, page: &str, identifier: &str) -> StepResult<&dyn Page> {
        let resource_type = &self.settings.page_resource_type;
        let Value::Object(parameters) = self.resources.resource(resource_type, identifier)? else {
            return Err(StepError::InvalidPageParameters {
                resource_type: resource_type.clone(),
                identifier: identifier.to_owned(),
            });
        };
        self.open_page(page, &parameters)
    }

    /// Check that the named page reports itself open.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Expectation`] if it is not.
    pub fn seeing(&self, page: &str) -> StepResult {
        let candidate = self.browser.page(page)?;
        expect_open(&*candidate, page)
    }

    /// Borrow the current page.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NoCurrentPage`] before any navigation.
    pub fn current_page(&self) -> StepResult<&dyn Page> {
        self.current_page
            .as_deref()
            .ok_or(StepError::NoCurrentPage)
    }

    fn current_page_mut(&mut self) -> StepResult<&mut (dyn Page + 'static)> {
        self.current_page
            .as_deref_mut()
            .ok_or(StepError::NoCurrentPage)
    }

    /// Check that the current page contains `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Expectation`] naming `text` when it is absent.
    pub fn assert_page_contains_text(&self, text: &str) -> StepResult {
        expect_content(self.current_page()?, text)
    }

    /// Check that the current page does not contain `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Expectation`] naming `text` when it is present.
    pub fn assert_page_not_contains_text(&self, text: &str) -> StepResult {
        expect_no_content(self.current_page()?, text)
    }

    /// Click a link on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NoCurrentPage`] before navigation, otherwise the
    /// page's error.
    pub fn click_link(&mut self, link: &str) -> StepResult {
        Ok(self.current_page_mut()?.click_link(link)?)
    }

    /// Press a button on the current page.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NoCurrentPage`] before navigation, otherwise the
    /// page's error.
    pub fn press_button(&mut self, button: &str) -> StepResult {
        Ok(self.current_page_mut()?.press_button(button)?)
    }

    /// Build and persist one resource.
    ///
    /// # Errors
    ///
    /// Propagates the resource contract's error.
    pub fn there_is_a_resource_called(
        &mut self,
        resource_type: &str,
        name: &str,
    ) -> StepResult<ResourceObject> {
        self.resources.persisted_resource_object(resource_type, name)
    }

    /// Persist one resource per row of `table`, named by its `name` column.
    ///
    /// The type is singularised first when plural support is enabled.
    ///
    /// # Errors
    ///
    /// Returns a table error when the `name` column is missing, otherwise the
    /// first persistence error. Rows before the failing one stay persisted.
    pub fn there_are_multiple_resources_called(
        &mut self,
        resource_type: &str,
        table: &Table,
    ) -> StepResult<Vec<ResourceObject>> {
        let singular = self.settings.inflector.singular(resource_type);
        table
            .column(NAME_COLUMN)?
            .iter()
            .map(|name| self.resources.persisted_resource_object(&singular, name))
            .collect()
    }

    /// Reload the current document.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Uninitialised`] without a session manager,
    /// otherwise the session's error.
    pub fn reload(&mut self) -> StepResult {
        Ok(self.browser.session()?.reload()?)
    }

    /// Move one entry back in the session history.
    ///
    /// # Errors
    ///
    /// See [`Self::reload`].
    pub fn back(&mut self) -> StepResult {
        Ok(self.browser.session()?.back()?)
    }

    /// Move one entry forward in the session history.
    ///
    /// # Errors
    ///
    /// See [`Self::reload`].
    pub fn forward(&mut self) -> StepResult {
        Ok(self.browser.session()?.forward()?)
    }

    /// Resolve the implementation class for `resource_type`.
    ///
    /// # Errors
    ///
    /// Propagates the resource contract's error.
    pub fn resource_class(&self, resource_type: &str) -> StepResult<String> {
        self.resources.resource_class(resource_type)
    }
}

impl std::fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("settings", &self.settings)
            .field("browser", &self.browser)
            .field("resources", &self.resources)
            .field("has_current_page", &self.current_page.is_some())
            .finish()
    }
}
