//! Read-only views of a card draw for the render surface.

use carousel_core::aggregate::AggregateRoot;
use carousel_document::domain::card::Card;
use serde::Serialize;

use crate::domain::aggregates::{CardDraw, DrawPhase};

/// A face-up slot and the card dealt to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevealedSlotView {
    /// Deck slot.
    pub slot: usize,
    /// Card dealt to the slot.
    pub card: Card,
}

/// Read-only view of a card draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawView {
    /// Bubble hosting the draw.
    pub bubble: usize,
    /// Current phase.
    pub phase: DrawPhase,
    /// Number of face-down slots.
    pub deck_size: usize,
    /// Cards the draw needs.
    pub required_count: usize,
    /// Revealed slots in reveal order.
    pub revealed: Vec<RevealedSlotView>,
    /// Slot currently mid-flip.
    pub flipping_slot: Option<usize>,
    /// Card being read, once showing.
    pub current_card: Option<Card>,
    /// Index of the card being read, in reveal order.
    pub current_card_index: usize,
    /// Text of the page being read.
    pub current_page_text: Option<String>,
    /// Zero-based page of the current card.
    pub page: usize,
    /// Pages of the current card.
    pub page_count: usize,
    /// Whether the last page has been reached.
    pub is_last_page_waiting: bool,
    /// Card-back image, also the fallback when a face fails to load.
    pub card_back: Option<String>,
    /// Number of events applied.
    pub version: i64,
}

/// Builds the view of `draw`.
#[must_use]
pub fn draw_view(draw: &CardDraw, card_back: Option<&str>) -> DrawView {
    let revealed = draw
        .drawn_order()
        .iter()
        .zip(draw.cards())
        .map(|(slot, card)| RevealedSlotView {
            slot: *slot,
            card: card.clone(),
        })
        .collect();

    DrawView {
        bubble: draw.bubble(),
        phase: draw.phase(),
        deck_size: draw.deck_size(),
        required_count: draw.required_count(),
        revealed,
        flipping_slot: draw.flipping_slot(),
        current_card: draw.current_card().cloned(),
        current_card_index: draw.current_card_index(),
        current_page_text: draw.current_page_text().map(str::to_owned),
        page: draw.interpretation_page(),
        page_count: draw.page_count(draw.current_card_index()),
        is_last_page_waiting: draw.is_last_page_waiting(),
        card_back: card_back.map(str::to_owned),
        version: draw.version(),
    }
}
