//! Carousel Core — shared abstractions.
//!
//! This crate defines the traits and types every carousel component depends
//! on: the event-sourced state abstraction, the clock, the virtual-time timer
//! queue, the host collaborator and the injected configuration. It contains
//! no rendering or transport code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod timer;
