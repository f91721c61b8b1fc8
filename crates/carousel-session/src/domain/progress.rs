//! Step and progress accounting across heterogeneous bubbles.
//!
//! A plain bubble is one step. A cards bubble is one step per interpretation
//! page of each drawable card, so progress moves page by page while the
//! reader works through a draw. `cards` is always the drawable slice
//! (`CardSet::drawable`), the same one the draw paginates.

use std::fmt;

use carousel_document::domain::card::Card;
use carousel_document::domain::model::{Bubble, Document};
use carousel_draw::domain::aggregates::CardDraw;
use serde::Serialize;

/// Steps contributed by one bubble.
#[must_use]
pub fn steps_for(bubble: &Bubble, cards: &[Card]) -> usize {
    if bubble.has_cards() {
        cards.iter().map(Card::page_count).sum()
    } else {
        1
    }
}

/// Steps across the whole document.
#[must_use]
pub fn total_steps(document: &Document, cards: &[Card]) -> usize {
    steps_before(document, cards, document.len())
}

/// Steps contributed by the bubbles before `index`.
#[must_use]
pub fn steps_before(document: &Document, cards: &[Card], index: usize) -> usize {
    document
        .contents
        .iter()
        .take(index)
        .map(|bubble| steps_for(bubble, cards))
        .sum()
}

/// Zero-based step of the reader on bubble `index`.
#[must_use]
pub fn current_step(
    document: &Document,
    cards: &[Card],
    index: usize,
    draw: Option<&CardDraw>,
) -> usize {
    steps_before(document, cards, index)
        + draw
            .filter(|draw| draw.bubble() == index)
            .map_or(0, CardDraw::flattened_offset)
}

/// Position of the reader for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Zero-based current step.
    pub current: usize,
    /// Total steps.
    pub total: usize,
}

impl Progress {
    /// One-based step shown to the reader, never above `total`.
    #[must_use]
    pub fn display_step(&self) -> usize {
        (self.current + 1).min(self.total)
    }

    /// `"N / total"`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.display_step(), self.total)
    }
}
