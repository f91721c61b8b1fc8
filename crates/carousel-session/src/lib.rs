//! Tarot carousel — Session runtime and progress.
//!
//! Wires one document to its navigation controller and the active card
//! draw, drives every delay through a virtual-time timer queue guarded by a
//! restart generation, and accounts for the "N / total" step progress.

pub mod application;
pub mod domain;
