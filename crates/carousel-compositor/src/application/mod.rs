//! Composition of a whole hero into render descriptors.

pub mod compose;
