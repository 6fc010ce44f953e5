//! In-memory collaborators for integration tests.
//!
//! [`FakeSite`] plays the page registry, the browser session and the
//! resource store at once. Every call is appended to a shared event log so
//! tests can assert on ordering.

#![allow(
    unfulfilled_lint_expectations,
    reason = "each test binary uses a subset of the helpers"
)]
#![expect(dead_code, reason = "each test binary uses a subset of the helpers")]

use anyhow::{Context, Result, anyhow, bail};
use hexavel::resource::{
    ClassRegistry, FixtureBuilder, ResourceBuilder, ResourceLoader, ResourceObject, ResourceStore,
};
use hexavel::{
    Browser, ContextSettings, Page, PageRegistry, Parameters, Resources, ScenarioContext, Session,
    SessionManager,
};
use serde_json::Value;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Calls observed by the fakes.
#[derive(Debug, Default)]
pub struct SiteLog {
    /// Name of the page the browser currently shows.
    pub shown: Option<String>,
    /// Every page opened, with its parameters.
    pub opened: Vec<(String, Parameters)>,
    /// Ordered log of calls such as `open Home` or `load Page/blue`.
    pub events: Vec<String>,
}

#[derive(Debug, Clone)]
struct PageSpec {
    content: String,
    opens: bool,
}

/// A scripted site with named pages and fixture data.
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    log: Rc<RefCell<SiteLog>>,
    pages: HashMap<String, PageSpec>,
    fixtures: serde_json::Map<String, Value>,
}

impl FakeSite {
    /// An empty site.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page showing `content` once opened.
    pub fn with_page(mut self, name: &str, content: &str) -> Self {
        self.pages.insert(
            name.to_owned(),
            PageSpec {
                content: content.to_owned(),
                opens: true,
            },
        );
        self
    }

    /// Add a page whose navigation never lands on it.
    pub fn with_broken_page(mut self, name: &str) -> Self {
        self.pages.insert(
            name.to_owned(),
            PageSpec {
                content: String::new(),
                opens: false,
            },
        );
        self
    }

    /// Add fixture data for `resource_type`/`identifier`.
    pub fn with_fixture(mut self, resource_type: &str, identifier: &str, data: Value) -> Self {
        let records = self
            .fixtures
            .entry(resource_type.to_owned())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(map) = records {
            map.insert(identifier.to_owned(), data);
        }
        self
    }

    /// Borrow the call log.
    pub fn log(&self) -> Ref<'_, SiteLog> {
        self.log.borrow()
    }

    /// Copy of the ordered event log.
    pub fn events(&self) -> Vec<String> {
        self.log.borrow().events.clone()
    }

    /// A browser facade over this site with a session manager attached.
    pub fn browser(&self) -> Browser {
        Browser::new(Box::new(self.clone())).with_session_manager(Box::new(FakeSessions {
            session: FakeSession {
                log: Rc::clone(&self.log),
            },
        }))
    }

    /// A resource contract backed by this site's fixtures.
    pub fn resources(&self) -> Resources {
        Resources::new(self.resources_builder())
    }

    /// The builder behind [`Self::resources`], for installing later.
    pub fn resources_builder(&self) -> Box<dyn ResourceBuilder> {
        let classes: ClassRegistry = self
            .fixtures
            .keys()
            .map(|ty| (ty.clone(), format!("App\\Models\\{ty}")))
            .collect();
        self.builder_with(
            FakeLoader {
                log: Rc::clone(&self.log),
                fixtures: self.fixtures.clone(),
            },
            classes,
        )
    }

    /// A resource contract over `loader` whose records land in this site's
    /// event log.
    pub fn resources_with<L>(&self, loader: L, classes: ClassRegistry) -> Resources
    where
        L: ResourceLoader + 'static,
    {
        Resources::new(self.builder_with(loader, classes))
    }

    fn builder_with<L>(&self, loader: L, classes: ClassRegistry) -> Box<dyn ResourceBuilder>
    where
        L: ResourceLoader + 'static,
    {
        Box::new(FixtureBuilder::new(
            loader,
            classes,
            LoggingStore {
                log: Rc::clone(&self.log),
            },
        ))
    }

    /// Records persisted so far, as `type/identifier`.
    pub fn persisted(&self) -> Vec<String> {
        self.log
            .borrow()
            .events
            .iter()
            .filter_map(|event| event.strip_prefix("persist "))
            .map(str::to_owned)
            .collect()
    }

    /// A scenario context wired to this site.
    pub fn context(&self) -> ScenarioContext {
        ScenarioContext::new(self.browser(), self.resources())
    }

    /// A scenario context with custom settings.
    pub fn context_with(&self, settings: ContextSettings) -> ScenarioContext {
        self.context().with_settings(settings)
    }

    fn record(&self, event: String) {
        self.log.borrow_mut().events.push(event);
    }
}

impl PageRegistry for FakeSite {
    fn page(&self, name: &str) -> Result<Box<dyn Page>> {
        let Some(spec) = self.pages.get(name) else {
            bail!("no page object named \"{name}\"");
        };
        Ok(Box::new(FakePage {
            name: name.to_owned(),
            spec: spec.clone(),
            site: self.clone(),
        }))
    }
}

struct FakePage {
    name: String,
    spec: PageSpec,
    site: FakeSite,
}

impl Page for FakePage {
    fn open(&mut self, parameters: &Parameters) -> Result<()> {
        self.site.record(format!("open {}", self.name));
        let mut log = self.site.log.borrow_mut();
        log.opened.push((self.name.clone(), parameters.clone()));
        log.shown = self.spec.opens.then(|| self.name.clone());
        Ok(())
    }

    fn is_open(&self) -> Result<bool> {
        Ok(self.site.log().shown.as_deref() == Some(self.name.as_str()))
    }

    fn has_content(&self, text: &str) -> Result<bool> {
        Ok(self.spec.content.contains(text))
    }

    fn click_link(&mut self, locator: &str) -> Result<()> {
        self.site.record(format!("click {locator}"));
        Ok(())
    }

    fn press_button(&mut self, locator: &str) -> Result<()> {
        self.site.record(format!("press {locator}"));
        Ok(())
    }
}

struct FakeSession {
    log: Rc<RefCell<SiteLog>>,
}

impl FakeSession {
    fn record(&self, event: &str) -> Result<()> {
        self.log.borrow_mut().events.push(event.to_owned());
        Ok(())
    }
}

impl Session for FakeSession {
    fn reload(&mut self) -> Result<()> {
        self.record("reload")
    }

    fn back(&mut self) -> Result<()> {
        self.record("back")
    }

    fn forward(&mut self) -> Result<()> {
        self.record("forward")
    }
}

struct FakeSessions {
    session: FakeSession,
}

impl SessionManager for FakeSessions {
    fn session(&mut self) -> Result<&mut dyn Session> {
        Ok(&mut self.session)
    }
}

struct FakeLoader {
    log: Rc<RefCell<SiteLog>>,
    fixtures: serde_json::Map<String, Value>,
}

impl ResourceLoader for FakeLoader {
    fn load(&self, resource_type: &str, identifier: &str) -> Result<Value> {
        self.log
            .borrow_mut()
            .events
            .push(format!("load {resource_type}/{identifier}"));
        self.fixtures
            .get(resource_type)
            .with_context(|| format!("unknown resource type \"{resource_type}\""))?
            .get(identifier)
            .cloned()
            .ok_or_else(|| anyhow!("unknown {resource_type} \"{identifier}\""))
    }
}

struct LoggingStore {
    log: Rc<RefCell<SiteLog>>,
}

impl ResourceStore for LoggingStore {
    fn store(&mut self, object: ResourceObject) -> Result<ResourceObject> {
        self.log.borrow_mut().events.push(format!(
            "persist {}/{}",
            object.resource_type, object.identifier
        ));
        Ok(object)
    }
}
