//! Tarot carousel — Document Model.
//!
//! Responsible for the declarative carousel document: typed bubbles, hero
//! layers and card sets, lenient normalization of externally supplied JSON or
//! YAML, and `{{variable}}` template substitution.

pub mod application;
pub mod domain;
