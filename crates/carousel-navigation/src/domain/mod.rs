//! Domain layer for navigation.

pub mod aggregates;
pub mod events;
pub mod gesture;
