//! The navigation controller aggregate.

use std::collections::BTreeSet;

use carousel_core::aggregate::AggregateRoot;
use carousel_core::clock::Clock;
use carousel_core::config::CarouselConfig;
use carousel_core::error::CarouselError;
use carousel_core::event::EventMetadata;
use carousel_document::domain::layer::Action;
use carousel_document::domain::model::{Bubble, Document};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::events::{
    AdvanceReason, AdvanceScheduled, CardBubbleCompleted, CooldownEnded, CooldownStarted,
    Navigated, NavigationCause, NavigationEvent, NavigationEventKind, Restarted,
    SessionCompleted,
};

/// The lock-relevant facts of one bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BubbleTraits {
    has_cards: bool,
    has_buttons: bool,
    cooldown_ms: Option<u64>,
}

impl From<&Bubble> for BubbleTraits {
    fn from(bubble: &Bubble) -> Self {
        Self {
            has_cards: bubble.has_cards(),
            has_buttons: bubble.has_buttons(),
            cooldown_ms: bubble.cooldown(),
        }
    }
}

/// Navigation state, mutated only by [`NavigationController`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NavigationState {
    /// Bubble being shown.
    pub current_index: usize,
    /// Cards bubbles whose flow has finished.
    pub completed_card_bubbles: BTreeSet<usize>,
    /// Bubbles currently cooling down.
    pub cooldown_bubbles: BTreeSet<usize>,
    /// Whether the final card flow has settled.
    pub completed: bool,
}

/// Result of pressing a button layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonOutcome {
    /// The controller moved to `to`.
    Navigated {
        /// Bubble entered.
        to: usize,
    },
    /// The current bubble is cooling down before moving to `target`.
    CooldownStarted {
        /// Bubble entered once the cooldown expires.
        target: usize,
        /// Cooldown length.
        duration_ms: u64,
    },
    /// Opaque data for the host.
    Postback {
        /// Payload.
        data: String,
        /// Optional echo text.
        display_text: Option<String>,
    },
    /// An in-app path for the router collaborator.
    Route {
        /// Internal path.
        path: String,
    },
    /// A location outside the application.
    External {
        /// Target location.
        uri: String,
        /// Open in a new surface.
        new_tab: bool,
    },
}

/// Whether `uri` is a path inside the application: starts with `/` but is not
/// protocol-relative.
#[must_use]
pub fn is_internal_path(uri: &str) -> bool {
    uri.starts_with('/') && !uri.starts_with("//")
}

/// The aggregate root for bubble navigation.
#[derive(Debug)]
pub struct NavigationController {
    session_id: Uuid,
    version: i64,
    bubbles: Vec<BubbleTraits>,
    one_directional: bool,
    auto_advance_delay_ms: u64,
    button_lock_advance_delay_ms: u64,
    state: NavigationState,
    uncommitted_events: Vec<NavigationEvent>,
}

impl NavigationController {
    /// Creates a controller positioned on the first bubble of `document`.
    #[must_use]
    pub fn new(session_id: Uuid, document: &Document, config: &CarouselConfig) -> Self {
        Self {
            session_id,
            version: 0,
            bubbles: document.contents.iter().map(BubbleTraits::from).collect(),
            one_directional: document.has_any_cards_bubble(),
            auto_advance_delay_ms: config.auto_advance_delay_ms,
            button_lock_advance_delay_ms: config.button_lock_advance_delay_ms,
            state: NavigationState::default(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Current navigation state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Bubble being shown.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    /// Number of bubbles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// Whether the document has no bubbles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Whether backward navigation is disabled for the whole session.
    #[must_use]
    pub fn is_one_directional(&self) -> bool {
        self.one_directional
    }

    /// Whether the final card flow has settled.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    fn cards_pending(&self, index: usize) -> bool {
        self.bubbles.get(index).is_some_and(|bubble| bubble.has_cards)
            && !self.state.completed_card_bubbles.contains(&index)
    }

    fn cooling_down(&self, index: usize) -> bool {
        self.state.cooldown_bubbles.contains(&index)
    }

    /// Whether gestures, arrow keys and dots are blocked on `index`: an
    /// unfinished card draw, a button layer, or an active cooldown.
    #[must_use]
    pub fn is_locked(&self, index: usize) -> bool {
        self.cards_pending(index)
            || self.bubbles.get(index).is_some_and(|bubble| bubble.has_buttons)
            || self.cooling_down(index)
    }

    /// Whether a gesture towards the next bubble would move.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        let current = self.state.current_index;
        !self.is_locked(current) && current + 1 < self.len()
    }

    /// Whether a gesture towards the previous bubble would move.
    #[must_use]
    pub fn can_go_prev(&self) -> bool {
        let current = self.state.current_index;
        !self.one_directional && !self.is_locked(current) && current > 0
    }

    fn record(&mut self, kind: NavigationEventKind, clock: &dyn Clock) {
        let event = NavigationEvent {
            metadata: EventMetadata::next(kind.event_type(), self.session_id, self.version, clock),
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    fn navigate(&mut self, to: usize, cause: NavigationCause, clock: &dyn Clock) {
        let from = self.state.current_index;
        info!(from, to, ?cause, "navigated");
        self.record(
            NavigationEventKind::Navigated(Navigated { from, to, cause }),
            clock,
        );
    }

    fn ignored(reason: &str) -> CarouselError {
        CarouselError::Ignored(reason.to_owned())
    }

    /// Moves to the next bubble.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if the current bubble is locked or is
    /// the last one.
    pub fn go_to_next(&mut self, clock: &dyn Clock) -> Result<(), CarouselError> {
        if !self.can_go_next() {
            return Err(Self::ignored("cannot move to the next bubble"));
        }
        self.navigate(self.state.current_index + 1, NavigationCause::Next, clock);
        Ok(())
    }

    /// Moves to the previous bubble.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if the session is one-directional,
    /// the current bubble is locked, or it is the first one.
    pub fn go_to_prev(&mut self, clock: &dyn Clock) -> Result<(), CarouselError> {
        if !self.can_go_prev() {
            return Err(Self::ignored("cannot move to the previous bubble"));
        }
        self.navigate(self.state.current_index - 1, NavigationCause::Prev, clock);
        Ok(())
    }

    /// Jumps to `target` from a progress dot.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if the current bubble is locked,
    /// `target` is out of range or current, or it lies behind in a
    /// one-directional session.
    pub fn goto(&mut self, target: usize, clock: &dyn Clock) -> Result<(), CarouselError> {
        if self.is_locked(self.state.current_index) {
            return Err(Self::ignored("current bubble is locked"));
        }
        self.check_target(target)?;
        self.navigate(target, NavigationCause::Goto, clock);
        Ok(())
    }

    fn check_target(&self, target: usize) -> Result<(), CarouselError> {
        let current = self.state.current_index;
        if target >= self.len() {
            return Err(Self::ignored("target bubble out of range"));
        }
        if target == current {
            return Err(Self::ignored("target bubble is already current"));
        }
        if self.one_directional && target < current {
            return Err(Self::ignored("backward navigation is disabled"));
        }
        Ok(())
    }

    /// Records that the card flow of `bubble` finished and decides what
    /// follows it: a quick advance into a button bubble, a cooldown, a
    /// regular auto-advance, or session completion on the last bubble.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if `bubble` has no cards or was
    /// already completed.
    pub fn on_card_draw_complete(
        &mut self,
        bubble: usize,
        clock: &dyn Clock,
    ) -> Result<(), CarouselError> {
        if !self.cards_pending(bubble) {
            return Err(Self::ignored("card bubble is not pending"));
        }
        self.record(
            NavigationEventKind::CardBubbleCompleted(CardBubbleCompleted { bubble }),
            clock,
        );

        let next = Some(bubble + 1).filter(|next| *next < self.len());
        let next_has_buttons = next
            .and_then(|next| self.bubbles.get(next))
            .is_some_and(|traits| traits.has_buttons);
        let cooldown = self.bubbles.get(bubble).and_then(|traits| traits.cooldown_ms);

        let kind = if next_has_buttons {
            NavigationEventKind::AdvanceScheduled(AdvanceScheduled {
                from: bubble,
                delay_ms: self.button_lock_advance_delay_ms,
                reason: AdvanceReason::ButtonLock,
            })
        } else if let Some(duration_ms) = cooldown {
            NavigationEventKind::CooldownStarted(CooldownStarted {
                bubble,
                duration_ms,
                target: next,
            })
        } else if next.is_some() {
            NavigationEventKind::AdvanceScheduled(AdvanceScheduled {
                from: bubble,
                delay_ms: self.auto_advance_delay_ms,
                reason: AdvanceReason::AutoAdvance,
            })
        } else {
            info!(bubble, "session completed");
            NavigationEventKind::SessionCompleted(SessionCompleted { bubble })
        };
        self.record(kind, clock);
        Ok(())
    }

    /// Fires a scheduled advance that started from `from`.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if the controller has moved since
    /// the advance was scheduled or `from` is the last bubble.
    pub fn auto_advance(&mut self, from: usize, clock: &dyn Clock) -> Result<(), CarouselError> {
        if self.state.current_index != from {
            return Err(Self::ignored("stale advance"));
        }
        if from + 1 >= self.len() {
            return Err(Self::ignored("no bubble to advance to"));
        }
        self.navigate(from + 1, NavigationCause::AutoAdvance, clock);
        Ok(())
    }

    /// Expires the cooldown of `bubble`, then moves to `target` (or completes
    /// the session when there is none) if `bubble` is still current.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if `bubble` is not cooling down.
    pub fn end_cooldown(
        &mut self,
        bubble: usize,
        target: Option<usize>,
        clock: &dyn Clock,
    ) -> Result<(), CarouselError> {
        if !self.cooling_down(bubble) {
            return Err(Self::ignored("bubble is not cooling down"));
        }
        self.record(
            NavigationEventKind::CooldownEnded(CooldownEnded { bubble }),
            clock,
        );
        if self.state.current_index != bubble {
            return Ok(());
        }

        match target.filter(|target| *target < self.len()) {
            Some(target) => self.navigate(target, NavigationCause::Cooldown, clock),
            None if self.state.completed_card_bubbles.contains(&bubble) => {
                info!(bubble, "session completed");
                self.record(
                    NavigationEventKind::SessionCompleted(SessionCompleted { bubble }),
                    clock,
                );
            }
            None => {}
        }
        Ok(())
    }

    /// Applies a button action pressed on the current bubble.
    ///
    /// `next` and `goto` bypass the button-layer lock only; an unfinished
    /// card draw still blocks them. A move away from a bubble with a
    /// cooldown starts the cooldown instead and lands when it expires.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Ignored` if the current bubble is cooling
    /// down or the requested move is not allowed.
    pub fn dispatch_button(
        &mut self,
        action: &Action,
        clock: &dyn Clock,
    ) -> Result<ButtonOutcome, CarouselError> {
        let current = self.state.current_index;
        if self.cooling_down(current) {
            return Err(Self::ignored("bubble is cooling down"));
        }

        match action {
            Action::Next => {
                if current + 1 >= self.len() {
                    return Err(Self::ignored("no next bubble"));
                }
                self.button_transition(current + 1, clock)
            }
            Action::Prev => {
                if self.one_directional {
                    return Err(Self::ignored("backward navigation is disabled"));
                }
                let Some(target) = current.checked_sub(1) else {
                    return Err(Self::ignored("no previous bubble"));
                };
                self.button_transition(target, clock)
            }
            Action::Goto { index } => {
                self.check_target(*index)?;
                self.button_transition(*index, clock)
            }
            Action::Postback { data, display_text } => Ok(ButtonOutcome::Postback {
                data: data.clone(),
                display_text: display_text.clone(),
            }),
            Action::Uri {
                uri,
                open_in_new_tab,
            } => {
                if is_internal_path(uri) && !open_in_new_tab {
                    Ok(ButtonOutcome::Route { path: uri.clone() })
                } else {
                    Ok(ButtonOutcome::External {
                        uri: uri.clone(),
                        new_tab: *open_in_new_tab,
                    })
                }
            }
        }
    }

    fn button_transition(
        &mut self,
        target: usize,
        clock: &dyn Clock,
    ) -> Result<ButtonOutcome, CarouselError> {
        let current = self.state.current_index;
        if self.cards_pending(current) {
            return Err(Self::ignored("card draw not finished"));
        }

        match self.bubbles.get(current).and_then(|traits| traits.cooldown_ms) {
            Some(duration_ms) => {
                self.record(
                    NavigationEventKind::CooldownStarted(CooldownStarted {
                        bubble: current,
                        duration_ms,
                        target: Some(target),
                    }),
                    clock,
                );
                Ok(ButtonOutcome::CooldownStarted {
                    target,
                    duration_ms,
                })
            }
            None => {
                self.navigate(target, NavigationCause::Button, clock);
                Ok(ButtonOutcome::Navigated { to: target })
            }
        }
    }

    /// Starts the session over on the first bubble.
    pub fn restart(&mut self, clock: &dyn Clock) {
        let from = self.state.current_index;
        info!(from, "navigation restarted");
        self.record(
            NavigationEventKind::Restarted(Restarted { from }),
            clock,
        );
    }
}

impl AggregateRoot for NavigationController {
    type Event = NavigationEvent;

    fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            NavigationEventKind::Navigated(payload) => {
                self.state.current_index = payload.to;
            }
            NavigationEventKind::CardBubbleCompleted(payload) => {
                self.state.completed_card_bubbles.insert(payload.bubble);
            }
            NavigationEventKind::AdvanceScheduled(_) => {}
            NavigationEventKind::CooldownStarted(payload) => {
                self.state.cooldown_bubbles.insert(payload.bubble);
            }
            NavigationEventKind::CooldownEnded(payload) => {
                self.state.cooldown_bubbles.remove(&payload.bubble);
            }
            NavigationEventKind::SessionCompleted(_) => {
                self.state.completed = true;
            }
            NavigationEventKind::Restarted(_) => {
                self.state = NavigationState::default();
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
    use carousel_test_support::fixtures::{
        button_bubble, cards_body_bubble, cards_layer_bubble, document, plain_bubble,
        with_cooldown,
    };
    use carousel_test_support::{FixedClock, fixed_now};
    use serde_json::{Value, json};

    use super::*;

    fn clock() -> FixedClock {
        FixedClock(fixed_now())
    }

    fn controller(bubbles: Vec<Value>) -> NavigationController {
        let document = Document::from_value(&document(bubbles));
        NavigationController::new(Uuid::new_v4(), &document, &CarouselConfig::default())
    }

    enum Step {
        Next,
        Prev,
        Dot(usize),
        Button(Action),
    }

    fn drained(controller: &mut NavigationController) -> Vec<NavigationEventKind> {
        controller
            .take_uncommitted_events()
            .into_iter()
            .map(|event| event.kind)
            .collect()
    }

    // --- gestures and locks ---

    #[test]
    fn test_single_plain_bubble_is_unlocked() {
        let controller = controller(vec![plain_bubble("hello")]);

        assert!(!controller.is_locked(0));
        assert!(!controller.is_one_directional());
    }

    #[test]
    fn test_go_to_next_and_prev_without_cards() {
        // Arrange
        let mut controller = controller(vec![plain_bubble("a"), plain_bubble("b")]);

        // Act
        controller.go_to_next(&clock()).unwrap();
        let past_end = controller.go_to_next(&clock());
        controller.go_to_prev(&clock()).unwrap();

        // Assert
        assert!(past_end.is_err());
        assert_eq!(controller.current_index(), 0);
        let events = controller.uncommitted_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "navigation.navigated");
        assert_eq!(events[1].metadata().sequence_number, 2);
    }

    #[test]
    fn test_unfinished_cards_lock_alone() {
        let mut controller = controller(vec![cards_body_bubble(), plain_bubble("after")]);

        assert!(controller.is_locked(0));
        assert!(controller.go_to_next(&clock()).is_err());

        controller.on_card_draw_complete(0, &clock()).unwrap();

        assert!(!controller.is_locked(0));
    }

    #[test]
    fn test_button_layer_locks_alone() {
        let controller = controller(vec![
            plain_bubble("intro"),
            button_bubble(json!({ "type": "next" })),
        ]);

        assert!(!controller.is_locked(0));
        assert!(controller.is_locked(1));
    }

    #[test]
    fn test_cooldown_locks_alone() {
        // Arrange
        let mut controller = controller(vec![
            with_cooldown(plain_bubble("wait"), 3000),
            plain_bubble("after"),
        ]);
        assert!(!controller.is_locked(0));

        // Act
        controller.record(
            NavigationEventKind::CooldownStarted(CooldownStarted {
                bubble: 0,
                duration_ms: 3000,
                target: Some(1),
            }),
            &clock(),
        );

        // Assert
        assert!(controller.is_locked(0));
        assert!(controller.go_to_next(&clock()).is_err());
        controller.end_cooldown(0, Some(1), &clock()).unwrap();
        assert!(!controller.is_locked(0));
        assert_eq!(controller.current_index(), 1);
    }

    #[test]
    fn test_dots_respect_lock_and_bounds() {
        let mut controller = controller(vec![plain_bubble("a"), plain_bubble("b"), plain_bubble("c")]);

        assert!(controller.goto(3, &clock()).is_err());
        assert!(controller.goto(0, &clock()).is_err());
        controller.goto(2, &clock()).unwrap();
        controller.goto(0, &clock()).unwrap();

        assert_eq!(controller.current_index(), 0);
    }

    #[test]
    fn test_index_never_decreases_once_any_bubble_has_cards() {
        // Arrange
        let mut controller = controller(vec![
            plain_bubble("intro"),
            plain_bubble("setup"),
            cards_layer_bubble(),
            plain_bubble("outro"),
        ]);
        let clock = clock();
        let mut seen = vec![controller.current_index()];

        // Act
        let steps = [
            Step::Next,
            Step::Prev,
            Step::Dot(0),
            Step::Dot(2),
            Step::Prev,
            Step::Dot(1),
            Step::Button(Action::Prev),
            Step::Button(Action::Goto { index: 0 }),
        ];
        for step in steps {
            let _ = match step {
                Step::Next => controller.go_to_next(&clock),
                Step::Prev => controller.go_to_prev(&clock),
                Step::Dot(index) => controller.goto(index, &clock),
                Step::Button(action) => controller.dispatch_button(&action, &clock).map(|_| ()),
            };
            seen.push(controller.current_index());
        }

        // Assert
        assert!(controller.is_one_directional());
        assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]), "{seen:?}");
        assert_eq!(controller.current_index(), 2);
    }

    // --- card completion ---

    #[test]
    fn test_card_completion_schedules_auto_advance_without_cooldown() {
        // Arrange
        let mut controller = controller(vec![cards_body_bubble(), plain_bubble("after")]);

        // Act
        controller.on_card_draw_complete(0, &clock()).unwrap();
        let scheduled = drained(&mut controller);
        controller.auto_advance(0, &clock()).unwrap();

        // Assert
        assert_eq!(
            scheduled[1],
            NavigationEventKind::AdvanceScheduled(AdvanceScheduled {
                from: 0,
                delay_ms: 1500,
                reason: AdvanceReason::AutoAdvance,
            })
        );
        assert_eq!(controller.current_index(), 1);
        assert!(controller.state().cooldown_bubbles.is_empty());
    }

    #[test]
    fn test_card_completion_before_button_bubble_uses_short_delay() {
        let mut controller = controller(vec![
            cards_body_bubble(),
            button_bubble(json!({ "type": "postback", "data": "again" })),
        ]);

        controller.on_card_draw_complete(0, &clock()).unwrap();
        let scheduled = drained(&mut controller);
        controller.auto_advance(0, &clock()).unwrap();

        match &scheduled[1] {
            NavigationEventKind::AdvanceScheduled(payload) => {
                assert_eq!(payload.delay_ms, 500);
                assert_eq!(payload.reason, AdvanceReason::ButtonLock);
            }
            other => panic!("expected AdvanceScheduled, got {other:?}"),
        }
        assert_eq!(controller.current_index(), 1);
        assert!(controller.is_locked(1));
        assert!(controller.go_to_next(&clock()).is_err());
    }

    #[test]
    fn test_card_completion_with_cooldown_starts_cooldown() {
        let mut controller = controller(vec![
            with_cooldown(cards_body_bubble(), 2000),
            plain_bubble("after"),
        ]);

        controller.on_card_draw_complete(0, &clock()).unwrap();

        assert!(controller.is_locked(0));
        assert_eq!(
            drained(&mut controller)[1],
            NavigationEventKind::CooldownStarted(CooldownStarted {
                bubble: 0,
                duration_ms: 2000,
                target: Some(1),
            })
        );
        controller.end_cooldown(0, Some(1), &clock()).unwrap();
        assert_eq!(controller.current_index(), 1);
    }

    #[test]
    fn test_last_card_bubble_completes_session() {
        let mut controller = controller(vec![plain_bubble("intro"), cards_body_bubble()]);
        controller.go_to_next(&clock()).unwrap();

        controller.on_card_draw_complete(1, &clock()).unwrap();

        assert!(controller.is_completed());
    }

    #[test]
    fn test_last_card_bubble_with_cooldown_completes_after_cooldown() {
        let mut controller = controller(vec![with_cooldown(cards_body_bubble(), 1000)]);

        controller.on_card_draw_complete(0, &clock()).unwrap();
        assert!(!controller.is_completed());
        controller.end_cooldown(0, None, &clock()).unwrap();

        assert!(controller.is_completed());
        assert_eq!(controller.current_index(), 0);
    }

    #[test]
    fn test_card_completion_is_accepted_once() {
        let mut controller = controller(vec![cards_body_bubble(), plain_bubble("after")]);

        controller.on_card_draw_complete(0, &clock()).unwrap();

        assert!(controller.on_card_draw_complete(0, &clock()).is_err());
        assert!(controller.on_card_draw_complete(1, &clock()).is_err());
    }

    #[test]
    fn test_stale_auto_advance_is_ignored() {
        let mut controller = controller(vec![cards_body_bubble(), plain_bubble("a"), plain_bubble("b")]);
        controller.on_card_draw_complete(0, &clock()).unwrap();
        controller.go_to_next(&clock()).unwrap();

        assert!(controller.auto_advance(0, &clock()).is_err());
        assert_eq!(controller.current_index(), 1);
    }

    // --- buttons ---

    #[test]
    fn test_button_next_bypasses_button_lock() {
        // Arrange
        let mut controller = controller(vec![
            button_bubble(json!({ "type": "next" })),
            plain_bubble("after"),
        ]);
        assert!(controller.is_locked(0));

        // Act
        let outcome = controller.dispatch_button(&Action::Next, &clock()).unwrap();

        // Assert
        assert_eq!(outcome, ButtonOutcome::Navigated { to: 1 });
        assert_eq!(controller.current_index(), 1);
    }

    #[test]
    fn test_button_next_does_not_bypass_unfinished_cards() {
        let mut controller = controller(vec![cards_layer_bubble(), plain_bubble("after")]);

        assert!(controller.dispatch_button(&Action::Next, &clock()).is_err());
        assert_eq!(controller.current_index(), 0);
    }

    #[test]
    fn test_button_goto_is_bounds_checked() {
        let mut controller = controller(vec![plain_bubble("a"), plain_bubble("b")]);

        assert!(controller.dispatch_button(&Action::Goto { index: 5 }, &clock()).is_err());
        assert_eq!(
            controller.dispatch_button(&Action::Goto { index: 1 }, &clock()).unwrap(),
            ButtonOutcome::Navigated { to: 1 }
        );
    }

    #[test]
    fn test_button_prev_allowed_without_cards() {
        let mut controller = controller(vec![plain_bubble("a"), plain_bubble("b")]);
        controller.go_to_next(&clock()).unwrap();

        let outcome = controller.dispatch_button(&Action::Prev, &clock()).unwrap();

        assert_eq!(outcome, ButtonOutcome::Navigated { to: 0 });
    }

    #[test]
    fn test_button_transition_from_cooldown_bubble_waits() {
        // Arrange
        let mut controller = controller(vec![
            with_cooldown(button_bubble(json!({ "type": "next" })), 1200),
            plain_bubble("after"),
        ]);

        // Act
        let outcome = controller.dispatch_button(&Action::Next, &clock()).unwrap();
        let pressed_again = controller.dispatch_button(&Action::Next, &clock());

        // Assert
        assert_eq!(
            outcome,
            ButtonOutcome::CooldownStarted {
                target: 1,
                duration_ms: 1200
            }
        );
        assert!(pressed_again.is_err());
        assert_eq!(controller.current_index(), 0);
        controller.end_cooldown(0, Some(1), &clock()).unwrap();
        assert_eq!(controller.current_index(), 1);
    }

    #[test]
    fn test_postback_and_uri_do_not_move() {
        let mut controller = controller(vec![button_bubble(json!({ "type": "next" }))]);
        let clock = clock();

        let postback = controller
            .dispatch_button(
                &Action::Postback {
                    data: "draw=again".to_owned(),
                    display_text: Some("Again".to_owned()),
                },
                &clock,
            )
            .unwrap();
        let internal = controller
            .dispatch_button(
                &Action::Uri {
                    uri: "/readings/42".to_owned(),
                    open_in_new_tab: false,
                },
                &clock,
            )
            .unwrap();
        let new_tab = controller
            .dispatch_button(
                &Action::Uri {
                    uri: "/readings/42".to_owned(),
                    open_in_new_tab: true,
                },
                &clock,
            )
            .unwrap();
        let protocol_relative = controller
            .dispatch_button(
                &Action::Uri {
                    uri: "//evil.example/x".to_owned(),
                    open_in_new_tab: false,
                },
                &clock,
            )
            .unwrap();

        assert_eq!(
            postback,
            ButtonOutcome::Postback {
                data: "draw=again".to_owned(),
                display_text: Some("Again".to_owned())
            }
        );
        assert_eq!(
            internal,
            ButtonOutcome::Route {
                path: "/readings/42".to_owned()
            }
        );
        assert!(matches!(new_tab, ButtonOutcome::External { new_tab: true, .. }));
        assert!(matches!(protocol_relative, ButtonOutcome::External { new_tab: false, .. }));
        assert_eq!(controller.version(), 0);
    }

    // --- restart ---

    #[test]
    fn test_restart_clears_state() {
        let mut controller = controller(vec![
            with_cooldown(cards_body_bubble(), 1000),
            plain_bubble("after"),
        ]);
        controller.on_card_draw_complete(0, &clock()).unwrap();

        controller.restart(&clock());

        assert_eq!(controller.state(), &NavigationState::default());
        assert!(controller.is_locked(0));
        assert!(controller.end_cooldown(0, Some(1), &clock()).is_err());
    }
}
