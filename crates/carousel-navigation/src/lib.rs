//! Tarot carousel — Navigation Controller.
//!
//! Responsible for which bubble is current and when the reader may leave it:
//! the lock policy, the one-directional rule for sessions containing a card
//! draw, cooldowns, automatic advances after a draw, button actions and
//! gesture classification.

pub mod application;
pub mod domain;
