//! Tarot carousel — Card-Draw Phase Engine.
//!
//! Owns the sub-state of a bubble that embeds the card draw: picking face-down
//! deck slots, revealing them after the flip, settling into the showing phase
//! and paging through each drawn card's interpretation.

pub mod application;
pub mod domain;
