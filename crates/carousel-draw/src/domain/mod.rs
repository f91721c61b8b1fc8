//! Domain layer for the card draw.

pub mod aggregates;
pub mod events;
