//! Shared test doubles and fixtures for the tarot carousel engine.

mod clock;
pub mod fixtures;
mod host;

pub use clock::{FixedClock, ManualClock, fixed_now};
pub use host::{HostCall, RecordingHost};
