//! Hexavel: step definitions for behaviour-driven browser testing.
//!
//! The crate binds natural-language phrases such as `I am on "Home"` or
//! `I should see "Welcome"` to calls against three collaborators supplied by
//! the hosting suite: a browser session manager, a page-object registry and
//! a resource builder.
//!
//! A suite builds a [`StepRegistry`] (usually [`StepRegistry::standard`]),
//! a [`ScenarioContext`] per scenario and a [`ScenarioRunner`] that resets
//! shared state through [`hooks`] before dispatching each step.
//!
//! ```
//! use hexavel::StepRegistry;
//!
//! let registry = StepRegistry::standard().unwrap();
//! assert!(registry.find("I am on \"Home\"").is_some());
//! assert!(registry.find("I juggle").is_none());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod expectation;
pub mod hooks;
pub mod inflect;
pub mod logging;
pub mod page;
pub mod resource;
pub mod scenario;
pub mod session;
pub mod snippet;
pub mod steps;
pub mod table;

/// Parameters passed to a page when it is opened, in insertion order.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

pub use config::{ConfigError, ContextConfig};
pub use context::{ContextSettings, ScenarioContext};
pub use error::{StepError, StepResult};
pub use expectation::ExpectationFailure;
pub use page::{Page, PageRegistry};
pub use resource::{ResourceObject, Resources};
pub use scenario::{Scenario, ScenarioFailure, ScenarioRunner, SuiteSummary};
pub use session::{Browser, Session, SessionManager};
pub use steps::{Step, StepArgs, StepKeyword, StepRegistry};
pub use table::{Table, TableError, cast_parameters_table};
