//! Domain types for the document model.

pub mod card;
pub mod layer;
pub mod model;
pub mod template;
