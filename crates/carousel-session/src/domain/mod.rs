//! Domain layer for the session.

pub mod commands;
pub mod progress;
