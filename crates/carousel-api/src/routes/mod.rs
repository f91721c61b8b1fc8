//! Route modules.

pub mod carousel;
pub mod health;
