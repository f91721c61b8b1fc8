//! Application layer for the card draw.

pub mod query_handlers;
