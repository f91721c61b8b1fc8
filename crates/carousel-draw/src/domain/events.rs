//! Domain events for the card draw.

use carousel_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Emitted when a face-down slot starts flipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelected {
    /// Bubble hosting the draw.
    pub bubble: usize,
    /// Selected deck slot.
    pub slot: usize,
}

/// Emitted when a flipping slot lands face up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRevealed {
    /// Bubble hosting the draw.
    pub bubble: usize,
    /// Revealed deck slot.
    pub slot: usize,
    /// Cards revealed so far, this one included.
    pub drawn_count: usize,
    /// Cards the draw needs.
    pub required_count: usize,
}

impl SlotRevealed {
    /// Whether this reveal filled the draw.
    #[must_use]
    pub fn completes_draw(&self) -> bool {
        self.drawn_count == self.required_count
    }
}

/// Emitted when the draw settles into the showing phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllDrawn {
    /// Bubble hosting the draw.
    pub bubble: usize,
    /// Slots in reveal order.
    pub drawn_order: Vec<usize>,
}

/// Emitted when the reader moves to another interpretation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAdvanced {
    /// Bubble hosting the draw.
    pub bubble: usize,
    /// Card now shown, in reveal order.
    pub card_index: usize,
    /// Page of that card now shown.
    pub page: usize,
}

/// Emitted once the last page of the last card has been reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BubbleCompleted {
    /// Bubble hosting the draw.
    pub bubble: usize,
}

/// Emitted when the draw returns to its initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawReset {
    /// Bubble hosting the draw.
    pub bubble: usize,
}

/// Event payload variants for the card draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardDrawEventKind {
    /// A slot started flipping.
    SlotSelected(SlotSelected),
    /// A slot was revealed.
    SlotRevealed(SlotRevealed),
    /// Every required card is revealed and the draw is showing.
    AllDrawn(AllDrawn),
    /// The interpretation page moved.
    PageAdvanced(PageAdvanced),
    /// The draw finished.
    BubbleCompleted(BubbleCompleted),
    /// The draw was reset.
    Reset(DrawReset),
}

impl CardDrawEventKind {
    /// Event type name recorded in metadata.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SlotSelected(_) => "card_draw.slot_selected",
            Self::SlotRevealed(_) => "card_draw.slot_revealed",
            Self::AllDrawn(_) => "card_draw.all_drawn",
            Self::PageAdvanced(_) => "card_draw.page_advanced",
            Self::BubbleCompleted(_) => "card_draw.bubble_completed",
            Self::Reset(_) => "card_draw.reset",
        }
    }
}

/// Domain event envelope for the card draw.
#[derive(Debug, Clone)]
pub struct CardDrawEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: CardDrawEventKind,
}

impl DomainEvent for CardDrawEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("CardDrawEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
