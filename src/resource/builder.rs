//! Fixture-backed resource builder.

use super::{ClassResolver, ResourceBuilder, ResourceLoader, ResourceObject};
use anyhow::{Context, Result};

/// Persists built resources.
pub trait ResourceStore {
    /// Store `object`, returning the persisted record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    fn store(&mut self, object: ResourceObject) -> Result<ResourceObject>;
}

/// Keeps persisted records in memory, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    records: Vec<ResourceObject>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Borrow the stored records.
    #[must_use]
    pub fn records(&self) -> &[ResourceObject] {
        &self.records
    }
}

impl ResourceStore for MemoryStore {
    fn store(&mut self, object: ResourceObject) -> Result<ResourceObject> {
        self.records.push(object.clone());
        Ok(object)
    }
}

/// Builds resources from a loader and a class resolver, persisting them
/// through a [`ResourceStore`].
pub struct FixtureBuilder<L, C, S> {
    loader: L,
    classes: C,
    store: S,
}

impl<L, C, S> FixtureBuilder<L, C, S>
where
    L: ResourceLoader,
    C: ClassResolver,
    S: ResourceStore,
{
    /// Compose a builder from its parts.
    #[must_use]
    pub const fn new(loader: L, classes: C, store: S) -> Self {
        Self {
            loader,
            classes,
            store,
        }
    }

    /// Borrow the record store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<L, C, S> ResourceBuilder for FixtureBuilder<L, C, S>
where
    L: ResourceLoader,
    C: ClassResolver,
    S: ResourceStore,
{
    fn loader(&self) -> &dyn ResourceLoader {
        &self.loader
    }

    fn class_resolver(&self) -> &dyn ClassResolver {
        &self.classes
    }

    fn build(&self, resource_type: &str, identifier: &str) -> Result<ResourceObject> {
        let class = self.classes.class_for_type(resource_type)?;
        let data = self.loader.load(resource_type, identifier)?;
        Ok(ResourceObject {
            resource_type: resource_type.to_owned(),
            identifier: identifier.to_owned(),
            class,
            data,
        })
    }

    fn persist(&mut self, resource_type: &str, identifier: &str) -> Result<ResourceObject> {
        let object = self.build(resource_type, identifier)?;
        self.store
            .store(object)
            .with_context(|| format!("persisting {resource_type} \"{identifier}\""))
    }
}

impl<L, C, S> std::fmt::Debug for FixtureBuilder<L, C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureBuilder").finish_non_exhaustive()
    }
}
