//! Domain events for navigation.

use carousel_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// What moved the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationCause {
    /// Swipe or arrow key towards the next bubble.
    Next,
    /// Swipe or arrow key towards the previous bubble.
    Prev,
    /// Progress dot.
    Goto,
    /// A button action.
    Button,
    /// Delayed advance after a card draw.
    AutoAdvance,
    /// A cooldown expired.
    Cooldown,
}

/// Why an advance was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceReason {
    /// The next bubble holds buttons; move on quickly so the reader can press one.
    ButtonLock,
    /// Plain advance after the card flow.
    AutoAdvance,
}

/// Emitted when the current bubble changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigated {
    /// Bubble left.
    pub from: usize,
    /// Bubble entered.
    pub to: usize,
    /// What moved the controller.
    pub cause: NavigationCause,
}

/// Emitted when a bubble's card flow finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBubbleCompleted {
    /// Bubble whose draw finished.
    pub bubble: usize,
}

/// Emitted when an advance away from `from` should happen after a delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceScheduled {
    /// Bubble the advance starts from.
    pub from: usize,
    /// Delay before the advance.
    pub delay_ms: u64,
    /// Why it was scheduled.
    pub reason: AdvanceReason,
}

/// Emitted when a bubble enters its cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownStarted {
    /// Bubble cooling down.
    pub bubble: usize,
    /// Cooldown length.
    pub duration_ms: u64,
    /// Bubble to enter when it expires; `None` completes the session.
    pub target: Option<usize>,
}

/// Emitted when a cooldown expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownEnded {
    /// Bubble that cooled down.
    pub bubble: usize,
}

/// Emitted once the final card flow has settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCompleted {
    /// Bubble the session finished on.
    pub bubble: usize,
}

/// Emitted when the session starts over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restarted {
    /// Bubble current before the restart.
    pub from: usize,
}

/// Event payload variants for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationEventKind {
    /// The current bubble changed.
    Navigated(Navigated),
    /// A bubble's card flow finished.
    CardBubbleCompleted(CardBubbleCompleted),
    /// A delayed advance was scheduled.
    AdvanceScheduled(AdvanceScheduled),
    /// A cooldown started.
    CooldownStarted(CooldownStarted),
    /// A cooldown expired.
    CooldownEnded(CooldownEnded),
    /// The session completed.
    SessionCompleted(SessionCompleted),
    /// The session restarted.
    Restarted(Restarted),
}

impl NavigationEventKind {
    /// Event type name recorded in metadata.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Navigated(_) => "navigation.navigated",
            Self::CardBubbleCompleted(_) => "navigation.card_bubble_completed",
            Self::AdvanceScheduled(_) => "navigation.advance_scheduled",
            Self::CooldownStarted(_) => "navigation.cooldown_started",
            Self::CooldownEnded(_) => "navigation.cooldown_ended",
            Self::SessionCompleted(_) => "navigation.session_completed",
            Self::Restarted(_) => "navigation.restarted",
        }
    }
}

/// Domain event envelope for navigation.
#[derive(Debug, Clone)]
pub struct NavigationEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: NavigationEventKind,
}

impl DomainEvent for NavigationEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("NavigationEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
