//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for state owners whose every mutation goes through an event.
///
/// Command methods decide, build an event and pass it to [`apply`]; the event
/// is then kept as uncommitted until the owning runtime drains it. `apply` is
/// the only place that writes state, so it doubles as the reducer
/// `(state, event) -> state`.
///
/// [`apply`]: AggregateRoot::apply
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the carousel session this state belongs to.
    fn session_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events produced since the last drain.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Removes and returns the uncommitted events.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
