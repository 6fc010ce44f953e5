//! Registry of implementation classes keyed by logical resource type.

use super::ClassResolver;
use indexmap::IndexMap;
use miette::Diagnostic;
use thiserror::Error;

/// Raised when a resource type has no registered class.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ClassError {
    /// The type is not registered.
    #[error("no class registered for resource type \"{resource_type}\"")]
    #[diagnostic(code(hexavel::resource::unknown_class))]
    Unknown {
        /// Requested resource type.
        resource_type: String,
    },
}

/// Ordered mapping from resource type to class name.
///
/// # Examples
///
/// ```
/// use hexavel::resource::{ClassRegistry, ClassResolver};
/// let classes = ClassRegistry::new().with("Widget", "App\\Models\\Widget");
/// assert_eq!(classes.class_for_type("Widget").unwrap(), "App\\Models\\Widget");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    classes: IndexMap<String, String>,
}

impl ClassRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class` for `resource_type`, replacing any earlier entry.
    pub fn register(&mut self, resource_type: impl Into<String>, class: impl Into<String>) {
        self.classes.insert(resource_type.into(), class.into());
    }

    /// Builder-style variant of [`Self::register`].
    #[must_use]
    pub fn with(mut self, resource_type: impl Into<String>, class: impl Into<String>) -> Self {
        self.register(resource_type, class);
        self
    }

    /// Look up the class for `resource_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::Unknown`] for unregistered types.
    pub fn resolve(&self, resource_type: &str) -> Result<&str, ClassError> {
        self.classes
            .get(resource_type)
            .map(String::as_str)
            .ok_or_else(|| ClassError::Unknown {
                resource_type: resource_type.to_owned(),
            })
    }

    /// Iterate over registered (type, class) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes.iter().map(|(ty, class)| (ty.as_str(), class.as_str()))
    }
}

impl ClassResolver for ClassRegistry {
    fn class_for_type(&self, resource_type: &str) -> anyhow::Result<String> {
        Ok(self.resolve(resource_type)?.to_owned())
    }
}

impl<K, V> FromIterator<(K, V)> for ClassRegistry
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            classes: iter
                .into_iter()
                .map(|(ty, class)| (ty.into(), class.into()))
                .collect(),
        }
    }
}
