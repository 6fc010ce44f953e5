//! BDD test module providing fixtures and step definitions.
//!
//! Scenario text is fed through the crate's own step registry, so each
//! feature file reads like a Behat suite driving the built-in phrases.

pub mod fixtures;
pub mod steps;
