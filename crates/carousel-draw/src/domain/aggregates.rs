//! The card-draw aggregate: one per bubble that embeds the draw.

use carousel_core::aggregate::AggregateRoot;
use carousel_core::clock::Clock;
use carousel_core::error::CarouselError;
use carousel_core::event::EventMetadata;
use carousel_document::domain::card::Card;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::events::{
    AllDrawn, BubbleCompleted, CardDrawEvent, CardDrawEventKind, DrawReset, PageAdvanced,
    SlotRevealed, SlotSelected,
};

/// Draw phase state machine. `Showing` is terminal within the bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawPhase {
    /// Picking face-down slots.
    Drawing,
    /// Reading the drawn cards' interpretations.
    Showing,
}

/// The aggregate root for a bubble's card draw.
#[derive(Debug)]
pub struct CardDraw {
    session_id: Uuid,
    bubble: usize,
    deck_size: usize,
    /// Drawable cards, at most `deck_size`; assigned to slots in reveal order.
    cards: Vec<Card>,
    version: i64,
    phase: DrawPhase,
    drawn_order: Vec<usize>,
    flipping_slot: Option<usize>,
    current_card_index: usize,
    interpretation_page: usize,
    is_last_page_waiting: bool,
    uncommitted_events: Vec<CardDrawEvent>,
}

impl CardDraw {
    /// Starts the draw for `bubble`.
    ///
    /// Only the first `deck_size` cards take part. With no drawable card the
    /// draw is complete on creation and records `BubbleCompleted` right away.
    #[must_use]
    pub fn start(
        session_id: Uuid,
        bubble: usize,
        cards: &[Card],
        deck_size: usize,
        clock: &dyn Clock,
    ) -> Self {
        let drawable = &cards[..cards.len().min(deck_size)];
        let mut draw = Self {
            session_id,
            bubble,
            deck_size,
            cards: drawable.to_vec(),
            version: 0,
            phase: DrawPhase::Drawing,
            drawn_order: Vec::new(),
            flipping_slot: None,
            current_card_index: 0,
            interpretation_page: 0,
            is_last_page_waiting: false,
            uncommitted_events: Vec::new(),
        };
        if draw.cards.is_empty() {
            draw.record(CardDrawEventKind::BubbleCompleted(BubbleCompleted { bubble }), clock);
        }
        draw
    }

    /// Bubble hosting this draw.
    #[must_use]
    pub fn bubble(&self) -> usize {
        self.bubble
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    /// Number of face-down slots.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    /// Number of cards the draw needs.
    #[must_use]
    pub fn required_count(&self) -> usize {
        self.cards.len()
    }

    /// The drawable cards, in the order they are dealt.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Revealed slots in reveal order.
    #[must_use]
    pub fn drawn_order(&self) -> &[usize] {
        &self.drawn_order
    }

    /// The slot currently mid-flip.
    #[must_use]
    pub fn flipping_slot(&self) -> Option<usize> {
        self.flipping_slot
    }

    /// Card shown while in the showing phase, in reveal order.
    #[must_use]
    pub fn current_card_index(&self) -> usize {
        self.current_card_index
    }

    /// Page of the current card being shown.
    #[must_use]
    pub fn interpretation_page(&self) -> usize {
        self.interpretation_page
    }

    /// Whether the last page has been reached and the draw is done.
    #[must_use]
    pub fn is_last_page_waiting(&self) -> bool {
        self.is_last_page_waiting
    }

    /// Whether every required card has been revealed.
    #[must_use]
    pub fn is_fully_drawn(&self) -> bool {
        self.drawn_order.len() == self.required_count()
    }

    /// Card dealt to a revealed slot.
    #[must_use]
    pub fn card_for_slot(&self, slot: usize) -> Option<&Card> {
        let position = self.drawn_order.iter().position(|drawn| *drawn == slot)?;
        self.cards.get(position)
    }

    /// Card being read, once showing.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        match self.phase {
            DrawPhase::Drawing => None,
            DrawPhase::Showing => self.cards.get(self.current_card_index),
        }
    }

    /// Text of the page being read, once showing.
    #[must_use]
    pub fn current_page_text(&self) -> Option<&str> {
        self.current_card()
            .and_then(|card| card.pages().get(self.interpretation_page).copied())
    }

    /// Pages of the card at `card_index`; zero past the end.
    #[must_use]
    pub fn page_count(&self, card_index: usize) -> usize {
        self.cards.get(card_index).map_or(0, Card::page_count)
    }

    /// Pages across every drawable card.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.cards.iter().map(Card::page_count).sum()
    }

    /// Position in the flattened `(card, page)` sequence. Zero while drawing.
    #[must_use]
    pub fn flattened_offset(&self) -> usize {
        match self.phase {
            DrawPhase::Drawing => 0,
            DrawPhase::Showing => {
                let before: usize = self.cards[..self.current_card_index.min(self.cards.len())]
                    .iter()
                    .map(Card::page_count)
                    .sum();
                before + self.interpretation_page
            }
        }
    }

    fn record(&mut self, kind: CardDrawEventKind, clock: &dyn Clock) {
        let event = CardDrawEvent {
            metadata: EventMetadata::next(kind.event_type(), self.session_id, self.version, clock),
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn ignored(reason: &str) -> CarouselError {
        CarouselError::Ignored(reason.to_owned())
    }

    /// Starts flipping `slot`, producing a `SlotSelected` event.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` when the draw is no longer drawing,
    /// another slot is mid-flip, `slot` is out of the deck or already drawn,
    /// or every required card has been drawn.
    pub fn select_slot(&mut self, slot: usize, clock: &dyn Clock) -> Result<(), CarouselError> {
        if self.phase != DrawPhase::Drawing {
            return Err(Self::ignored("draw is already showing"));
        }
        if self.flipping_slot.is_some() {
            return Err(Self::ignored("another slot is flipping"));
        }
        if slot >= self.deck_size {
            return Err(Self::ignored("slot is outside the deck"));
        }
        if self.drawn_order.contains(&slot) {
            return Err(Self::ignored("slot already drawn"));
        }
        if self.is_fully_drawn() {
            return Err(Self::ignored("all cards already drawn"));
        }

        self.record(
            CardDrawEventKind::SlotSelected(SlotSelected {
                bubble: self.bubble,
                slot,
            }),
            clock,
        );
        Ok(())
    }

    /// Lands the flip of `slot`, producing a `SlotRevealed` event.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if `slot` is not the flipping slot.
    pub fn finish_flip(&mut self, slot: usize, clock: &dyn Clock) -> Result<(), CarouselError> {
        if self.flipping_slot != Some(slot) {
            return Err(Self::ignored("slot is not flipping"));
        }

        self.record(
            CardDrawEventKind::SlotRevealed(SlotRevealed {
                bubble: self.bubble,
                slot,
                drawn_count: self.drawn_order.len() + 1,
                required_count: self.required_count(),
            }),
            clock,
        );
        Ok(())
    }

    /// Moves a fully drawn deck to the showing phase, producing `AllDrawn`.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` unless the draw is still drawing and
    /// every required card is revealed.
    pub fn settle(&mut self, clock: &dyn Clock) -> Result<(), CarouselError> {
        if self.phase != DrawPhase::Drawing || !self.is_fully_drawn() {
            return Err(Self::ignored("draw is not ready to settle"));
        }

        self.record(
            CardDrawEventKind::AllDrawn(AllDrawn {
                bubble: self.bubble,
                drawn_order: self.drawn_order.clone(),
            }),
            clock,
        );
        info!(bubble = self.bubble, cards = self.required_count(), "card draw settled");
        Ok(())
    }

    /// Moves to the next interpretation page, then the next card, then
    /// completes the bubble.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` while drawing or once the last page
    /// is waiting.
    pub fn advance(&mut self, clock: &dyn Clock) -> Result<(), CarouselError> {
        if self.phase != DrawPhase::Showing {
            return Err(Self::ignored("cards are still being drawn"));
        }
        if self.is_last_page_waiting {
            return Err(Self::ignored("last page already reached"));
        }

        let kind = if self.interpretation_page + 1 < self.page_count(self.current_card_index) {
            CardDrawEventKind::PageAdvanced(PageAdvanced {
                bubble: self.bubble,
                card_index: self.current_card_index,
                page: self.interpretation_page + 1,
            })
        } else if self.current_card_index + 1 < self.required_count() {
            CardDrawEventKind::PageAdvanced(PageAdvanced {
                bubble: self.bubble,
                card_index: self.current_card_index + 1,
                page: 0,
            })
        } else {
            info!(bubble = self.bubble, "card draw complete");
            CardDrawEventKind::BubbleCompleted(BubbleCompleted {
                bubble: self.bubble,
            })
        };
        self.record(kind, clock);
        Ok(())
    }

    /// Returns the draw to its initial state, producing a `Reset` event.
    ///
    /// A draw without drawable cards completes again immediately.
    pub fn reset(&mut self, clock: &dyn Clock) {
        self.record(
            CardDrawEventKind::Reset(DrawReset {
                bubble: self.bubble,
            }),
            clock,
        );
        if self.cards.is_empty() {
            self.record(
                CardDrawEventKind::BubbleCompleted(BubbleCompleted {
                    bubble: self.bubble,
                }),
                clock,
            );
        }
    }
}

impl AggregateRoot for CardDraw {
    type Event = CardDrawEvent;

    fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            CardDrawEventKind::SlotSelected(payload) => {
                self.flipping_slot = Some(payload.slot);
            }
            CardDrawEventKind::SlotRevealed(payload) => {
                self.drawn_order.push(payload.slot);
                self.flipping_slot = None;
            }
            CardDrawEventKind::AllDrawn(_) => {
                self.phase = DrawPhase::Showing;
                self.current_card_index = 0;
                self.interpretation_page = 0;
            }
            CardDrawEventKind::PageAdvanced(payload) => {
                self.current_card_index = payload.card_index;
                self.interpretation_page = payload.page;
            }
            CardDrawEventKind::BubbleCompleted(_) => {
                self.phase = DrawPhase::Showing;
                self.is_last_page_waiting = true;
            }
            CardDrawEventKind::Reset(_) => {
                self.phase = DrawPhase::Drawing;
                self.drawn_order.clear();
                self.flipping_slot = None;
                self.current_card_index = 0;
                self.interpretation_page = 0;
                self.is_last_page_waiting = false;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use carousel_core::event::DomainEvent;
    use carousel_document::domain::card::CardSet;
    use carousel_test_support::fixtures;
    use carousel_test_support::{FixedClock, fixed_now};

    use super::*;

    fn clock() -> FixedClock {
        FixedClock(fixed_now())
    }

    fn cards(pairs: &[(&str, &str)]) -> Vec<Card> {
        CardSet::from_value(&fixtures::card_set(pairs)).content
    }

    fn draw_with(pairs: &[(&str, &str)], deck_size: usize) -> CardDraw {
        CardDraw::start(Uuid::new_v4(), 1, &cards(pairs), deck_size, &clock())
    }

    fn draw_all(draw: &mut CardDraw, slots: &[usize]) {
        let clock = clock();
        for slot in slots {
            draw.select_slot(*slot, &clock).unwrap();
            draw.finish_flip(*slot, &clock).unwrap();
        }
        draw.settle(&clock).unwrap();
    }

    fn event_types(draw: &mut CardDraw) -> Vec<&'static str> {
        draw.take_uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }

    // --- drawing ---

    #[test]
    fn test_select_slot_marks_slot_flipping() {
        // Arrange
        let mut draw = draw_with(&[("The Star", "hope")], 25);

        // Act
        let result = draw.select_slot(7, &clock());

        // Assert
        assert!(result.is_ok());
        assert_eq!(draw.flipping_slot(), Some(7));
        assert!(draw.drawn_order().is_empty());
        let events = draw.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "card_draw.slot_selected");
        assert_eq!(events[0].metadata().sequence_number, 1);
    }

    #[test]
    fn test_select_slot_while_another_flips_is_ignored() {
        let mut draw = draw_with(&[("The Star", "hope"), ("The Moon", "dreams")], 25);
        draw.select_slot(3, &clock()).unwrap();

        let result = draw.select_slot(4, &clock());

        assert!(matches!(result, Err(CarouselError::Ignored(_))));
        assert_eq!(draw.flipping_slot(), Some(3));
    }

    #[test]
    fn test_select_slot_outside_deck_is_ignored() {
        let mut draw = draw_with(&[("The Star", "hope")], 5);

        assert!(draw.select_slot(5, &clock()).is_err());
        assert!(draw.select_slot(4, &clock()).is_ok());
    }

    #[test]
    fn test_slot_is_drawn_at_most_once_and_never_beyond_required() {
        // Arrange
        let mut draw = draw_with(&[("The Star", "hope"), ("The Moon", "dreams")], 25);
        let clock = clock();

        // Act
        draw.select_slot(2, &clock).unwrap();
        draw.finish_flip(2, &clock).unwrap();
        let again = draw.select_slot(2, &clock);
        draw.select_slot(9, &clock).unwrap();
        draw.finish_flip(9, &clock).unwrap();
        let extra = draw.select_slot(11, &clock);

        // Assert
        assert!(again.is_err());
        assert!(extra.is_err());
        assert_eq!(draw.drawn_order(), &[2, 9]);
        assert!(draw.is_fully_drawn());
    }

    #[test]
    fn test_finish_flip_for_other_slot_is_ignored() {
        let mut draw = draw_with(&[("The Star", "hope")], 25);
        draw.select_slot(1, &clock()).unwrap();

        assert!(draw.finish_flip(2, &clock()).is_err());
        assert_eq!(draw.flipping_slot(), Some(1));
    }

    #[test]
    fn test_card_for_slot_follows_reveal_order() {
        let mut draw = draw_with(&[("The Star", "hope"), ("The Moon", "dreams")], 25);
        let clock = clock();
        draw.select_slot(20, &clock).unwrap();
        draw.finish_flip(20, &clock).unwrap();
        draw.select_slot(3, &clock).unwrap();
        draw.finish_flip(3, &clock).unwrap();

        assert_eq!(draw.card_for_slot(20).map(|c| c.title.as_str()), Some("The Star"));
        assert_eq!(draw.card_for_slot(3).map(|c| c.title.as_str()), Some("The Moon"));
        assert_eq!(draw.card_for_slot(4), None);
    }

    #[test]
    fn test_settle_requires_full_draw() {
        let mut draw = draw_with(&[("The Star", "hope"), ("The Moon", "dreams")], 25);
        let clock = clock();
        draw.select_slot(0, &clock).unwrap();
        draw.finish_flip(0, &clock).unwrap();

        assert!(draw.settle(&clock).is_err());
        assert_eq!(draw.phase(), DrawPhase::Drawing);
    }

    #[test]
    fn test_required_count_is_capped_by_deck_size() {
        let draw = draw_with(&[("A", "a"), ("B", "b"), ("C", "c")], 2);

        assert_eq!(draw.required_count(), 2);
        assert_eq!(draw.total_pages(), 2);
    }

    // --- showing ---

    #[test]
    fn test_single_card_with_two_pages_reaches_waiting_after_two_advances() {
        // Arrange
        let mut draw = draw_with(&[("The Tower", "x|y")], 25);
        draw_all(&mut draw, &[12]);
        assert_eq!(draw.phase(), DrawPhase::Showing);
        assert_eq!(draw.current_page_text(), Some("x"));

        // Act
        draw.advance(&clock()).unwrap();
        let mid_text = draw.current_page_text().map(str::to_owned);
        draw.advance(&clock()).unwrap();

        // Assert
        assert_eq!(mid_text.as_deref(), Some("y"));
        assert!(draw.is_last_page_waiting());
        assert_eq!(draw.total_pages(), 2);
    }

    #[test]
    fn test_pages_are_visited_before_the_next_card() {
        let mut draw = draw_with(&[("A", "A|B|C"), ("B", "only one")], 25);
        draw_all(&mut draw, &[0, 1]);
        let clock = clock();
        let mut seen = vec![draw.current_page_text().unwrap_or_default().to_owned()];

        while !draw.is_last_page_waiting() {
            draw.advance(&clock).unwrap();
            if let Some(text) = draw.current_page_text() {
                seen.push(text.to_owned());
            }
        }

        assert_eq!(seen, vec!["A", "B", "C", "only one", "only one"]);
        assert_eq!(draw.page_count(1), 1);
    }

    #[test]
    fn test_advance_while_drawing_or_waiting_is_ignored() {
        let mut draw = draw_with(&[("A", "one")], 25);
        assert!(draw.advance(&clock()).is_err());

        draw_all(&mut draw, &[0]);
        draw.advance(&clock()).unwrap();
        let version = draw.version();

        assert!(draw.advance(&clock()).is_err());
        assert_eq!(draw.version(), version);
    }

    #[test]
    fn test_bubble_completed_is_recorded_exactly_once() {
        let mut draw = draw_with(&[("A", "one|two")], 25);
        draw_all(&mut draw, &[5]);
        let clock = clock();
        for _ in 0..5 {
            let _ = draw.advance(&clock);
        }

        let completed = event_types(&mut draw)
            .into_iter()
            .filter(|t| *t == "card_draw.bubble_completed")
            .count();
        assert_eq!(completed, 1);
    }

    #[test]
    fn test_flattened_offset_tracks_card_and_page() {
        let mut draw = draw_with(&[("A", "a1|a2"), ("B", "b1|b2|b3")], 25);
        assert_eq!(draw.flattened_offset(), 0);
        draw_all(&mut draw, &[0, 1]);
        let clock = clock();

        draw.advance(&clock).unwrap();
        draw.advance(&clock).unwrap();
        draw.advance(&clock).unwrap();

        assert_eq!(draw.current_card_index(), 1);
        assert_eq!(draw.interpretation_page(), 1);
        assert_eq!(draw.flattened_offset(), 3);
    }

    // --- lifecycle ---

    #[test]
    fn test_empty_draw_completes_on_creation() {
        let mut draw = draw_with(&[], 25);

        assert_eq!(draw.phase(), DrawPhase::Showing);
        assert!(draw.is_last_page_waiting());
        assert_eq!(event_types(&mut draw), vec!["card_draw.bubble_completed"]);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        // Arrange
        let mut draw = draw_with(&[("A", "a1|a2")], 25);
        draw_all(&mut draw, &[4]);
        draw.advance(&clock()).unwrap();
        draw.take_uncommitted_events();

        // Act
        draw.reset(&clock());

        // Assert
        assert_eq!(draw.phase(), DrawPhase::Drawing);
        assert!(draw.drawn_order().is_empty());
        assert_eq!(draw.flipping_slot(), None);
        assert_eq!(draw.current_card_index(), 0);
        assert_eq!(draw.interpretation_page(), 0);
        assert!(!draw.is_last_page_waiting());
        assert_eq!(event_types(&mut draw), vec!["card_draw.reset"]);
    }

    #[test]
    fn test_events_carry_session_and_sequence() {
        let session_id = Uuid::new_v4();
        let mut draw = CardDraw::start(session_id, 0, &cards(&[("A", "a")]), 25, &clock());
        draw.select_slot(1, &clock()).unwrap();
        draw.finish_flip(1, &clock()).unwrap();

        let events = draw.take_uncommitted_events();

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.metadata().session_id == session_id));
        assert_eq!(events[1].metadata().sequence_number, 2);
        assert_eq!(events[1].metadata().occurred_at, fixed_now());
        assert!(draw.uncommitted_events().is_empty());
        match &events[1].kind {
            CardDrawEventKind::SlotRevealed(payload) => assert!(payload.completes_draw()),
            other => panic!("expected SlotRevealed, got {other:?}"),
        }
    }
}
