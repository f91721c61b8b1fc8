//! Application layer for navigation.

pub mod query_handlers;
