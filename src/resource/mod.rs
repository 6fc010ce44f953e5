//! Resource contract: indirection between logical resource types and the
//! data, objects and records behind them.
//!
//! Steps say "a Widget called X" without knowing how widgets are built. The
//! [`ResourceBuilder`] seam answers four questions for a (type, identifier)
//! pair: what is the raw fixture data, what object does it build into, what
//! record results from persisting it, and which implementation class backs
//! the type.
//!
//! [`FixtureBuilder`] is a ready-made builder composed from a
//! [`FixtureLoader`], a [`ClassRegistry`] and a [`ResourceStore`].

mod builder;
mod classes;
mod fixtures;

pub use builder::{FixtureBuilder, MemoryStore, ResourceStore};
pub use classes::{ClassError, ClassRegistry};
pub use fixtures::{FixtureError, FixtureLoader};

use crate::error::{StepError, StepResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Loads raw fixture data.
pub trait ResourceLoader {
    /// Return the data stored for `identifier` under `resource_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is unknown or the identifier is missing.
    fn load(&self, resource_type: &str, identifier: &str) -> Result<Value>;
}

/// Maps logical resource types to implementation class names.
pub trait ClassResolver {
    /// Return the class registered for `resource_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is not registered.
    fn class_for_type(&self, resource_type: &str) -> Result<String>;
}

/// Builds and persists resources from fixture data.
pub trait ResourceBuilder {
    /// Borrow the loader used for raw data.
    fn loader(&self) -> &dyn ResourceLoader;

    /// Borrow the class resolver.
    fn class_resolver(&self) -> &dyn ClassResolver;

    /// Build a resource without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or class resolution fails.
    fn build(&self, resource_type: &str, identifier: &str) -> Result<ResourceObject>;

    /// Build a resource and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if building or storage fails.
    fn persist(&mut self, resource_type: &str, identifier: &str) -> Result<ResourceObject>;
}

/// A resource built from fixture data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// Logical type name the resource was requested under.
    pub resource_type: String,
    /// Identifier within the type.
    pub identifier: String,
    /// Implementation class resolved for the type.
    pub class: String,
    /// Fixture data the resource was built from.
    pub data: Value,
}

/// Scenario-facing wrapper around an optional [`ResourceBuilder`].
#[derive(Default)]
pub struct Resources {
    builder: Option<Box<dyn ResourceBuilder>>,
}

impl Resources {
    /// Create a wrapper around `builder`.
    #[must_use]
    pub fn new(builder: Box<dyn ResourceBuilder>) -> Self {
        Self {
            builder: Some(builder),
        }
    }

    /// Replace the resource builder.
    pub fn set_builder(&mut self, builder: Box<dyn ResourceBuilder>) {
        self.builder = Some(builder);
    }

    fn builder(&self) -> StepResult<&dyn ResourceBuilder> {
        self.builder.as_deref().ok_or(StepError::Uninitialised {
            component: "resource builder",
        })
    }

    fn builder_mut(&mut self) -> StepResult<&mut (dyn ResourceBuilder + 'static)> {
        self.builder.as_deref_mut().ok_or(StepError::Uninitialised {
            component: "resource builder",
        })
    }

    /// Load raw data for a resource.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Uninitialised`] without a builder, otherwise the
    /// loader's error.
    pub fn resource(&self, resource_type: &str, identifier: &str) -> StepResult<Value> {
        Ok(self.builder()?.loader().load(resource_type, identifier)?)
    }

    /// Build a resource without persisting it.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Uninitialised`] without a builder, otherwise the
    /// builder's error.
    pub fn resource_object(
        &self,
        resource_type: &str,
        identifier: &str,
    ) -> StepResult<ResourceObject> {
        Ok(self.builder()?.build(resource_type, identifier)?)
    }

    /// Build and persist a resource.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Uninitialised`] without a builder, otherwise the
    /// builder's error.
    pub fn persisted_resource_object(
        &mut self,
        resource_type: &str,
        identifier: &str,
    ) -> StepResult<ResourceObject> {
        tracing::debug!(resource_type, identifier, "persisting resource");
        Ok(self.builder_mut()?.persist(resource_type, identifier)?)
    }

    /// Resolve the implementation class for a resource type.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Uninitialised`] without a builder, otherwise the
    /// resolver's error.
    pub fn resource_class(&self, resource_type: &str) -> StepResult<String> {
        Ok(self.builder()?.class_resolver().class_for_type(resource_type)?)
    }
}

impl std::fmt::Debug for Resources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resources")
            .field("has_builder", &self.builder.is_some())
            .finish()
    }
}
