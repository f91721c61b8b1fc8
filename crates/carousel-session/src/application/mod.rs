//! Application layer for the session.

pub mod carousel;
pub mod query_handlers;
