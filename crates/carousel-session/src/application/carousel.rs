//! The carousel session runtime.
//!
//! Owns one substituted document, its navigation controller, the card draw
//! of the current bubble, the audio playback of the current bubble and the
//! timer queue. Inputs and timer firings are routed to the owning component;
//! the events they record are then drained and turned into timers, host
//! callbacks and cross-component calls until nothing is left to process.

use std::collections::BTreeMap;
use std::sync::Arc;

use carousel_compositor::domain::audio::AudioPlayback;
use carousel_core::aggregate::AggregateRoot;
use carousel_core::clock::Clock;
use carousel_core::command::Command;
use carousel_core::config::CarouselConfig;
use carousel_core::error::CarouselError;
use carousel_core::host::CarouselHost;
use carousel_core::timer::TimerQueue;
use carousel_document::application::loader::LoadedCarousel;
use carousel_document::domain::card::Card;
use carousel_document::domain::layer::Layer;
use carousel_document::domain::model::{Bubble, Document};
use carousel_draw::domain::aggregates::{CardDraw, DrawPhase};
use carousel_draw::domain::events::{CardDrawEvent, CardDrawEventKind};
use carousel_navigation::domain::aggregates::{ButtonOutcome, NavigationController};
use carousel_navigation::domain::events::{NavigationEvent, NavigationEventKind};
use carousel_navigation::domain::gesture::{Direction, Gesture, classify_swipe, key_direction};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::application::query_handlers::{CarouselView, carousel_view};
use crate::domain::commands::Input;
use crate::domain::progress::{Progress, current_step, total_steps};

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    /// The flip of `slot` has finished.
    FlipElapsed { bubble: usize, slot: usize },
    /// The draw of `bubble` may enter the showing phase.
    DrawSettled { bubble: usize },
    /// Advance past `from`.
    AutoAdvance { from: usize },
    /// The cooldown of `bubble` expires.
    CooldownExpired { bubble: usize, target: Option<usize> },
}

/// A timer payload stamped with the generation it was scheduled in.
#[derive(Debug, Clone, Copy)]
struct ScheduledTimer {
    generation: u64,
    event: TimerEvent,
}

/// One running carousel.
pub struct Carousel {
    session_id: Uuid,
    config: CarouselConfig,
    document: Document,
    cards: Vec<Card>,
    card_back: Option<String>,
    controller: NavigationController,
    draw: Option<CardDraw>,
    audio: BTreeMap<usize, AudioPlayback>,
    audio_synced_ms: u64,
    timers: TimerQueue<ScheduledTimer>,
    generation: u64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("session_id", &self.session_id)
            .field("bubbles", &self.document.len())
            .field("current_index", &self.controller.current_index())
            .field("generation", &self.generation)
            .field("pending_timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

impl Carousel {
    /// Starts a session on the first bubble of `loaded`.
    ///
    /// If the first bubble is a cards bubble with nothing to draw, its
    /// completion is processed right away, so `host` may already be called.
    pub fn start(
        session_id: Uuid,
        loaded: LoadedCarousel,
        config: CarouselConfig,
        clock: Arc<dyn Clock>,
        host: &mut dyn CarouselHost,
    ) -> Self {
        let LoadedCarousel { document, cards } = loaded;
        let (cards, card_back) = match cards {
            Some(set) => (set.drawable(config.deck_size).to_vec(), set.style),
            None => (Vec::new(), None),
        };
        let controller = NavigationController::new(session_id, &document, &config);

        let mut carousel = Self {
            session_id,
            config,
            document,
            cards,
            card_back,
            controller,
            draw: None,
            audio: BTreeMap::new(),
            audio_synced_ms: 0,
            timers: TimerQueue::new(),
            generation: 0,
            clock,
        };
        info!(
            %session_id,
            bubbles = carousel.document.len(),
            cards = carousel.cards.len(),
            "carousel started"
        );
        carousel.enter_current_bubble();
        carousel.process(host);
        carousel
    }

    /// Session identifier.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The substituted document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Drawable cards.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Card-back image of the card set.
    #[must_use]
    pub fn card_back(&self) -> Option<&str> {
        self.card_back.as_deref()
    }

    /// The navigation controller.
    #[must_use]
    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    /// The draw of the current bubble, if it has cards.
    #[must_use]
    pub fn draw(&self) -> Option<&CardDraw> {
        self.draw.as_ref()
    }

    /// Audio playback of the current bubble, by hero layer index.
    #[must_use]
    pub fn audio(&self) -> &BTreeMap<usize, AudioPlayback> {
        &self.audio
    }

    /// The bubble being shown, `None` for an empty document.
    #[must_use]
    pub fn current_bubble(&self) -> Option<&Bubble> {
        self.document.bubble(self.controller.current_index())
    }

    /// Restart counter; timers from older generations never apply.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Virtual time in milliseconds since the session started.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Step progress of the reader.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            current: current_step(
                &self.document,
                &self.cards,
                self.controller.current_index(),
                self.draw.as_ref(),
            ),
            total: total_steps(&self.document, &self.cards),
        }
    }

    /// Everything needed to render the current frame; `None` for an empty
    /// document.
    #[must_use]
    pub fn view(&self) -> Option<CarouselView> {
        carousel_view(self)
    }

    /// Handles one user interaction. Interactions that do not apply in the
    /// current state are ignored.
    pub fn handle(&mut self, input: Input, host: &mut dyn CarouselHost) {
        let command = input.command_type();
        if self.document.is_empty() {
            debug!(command, "input ignored on empty document");
            return;
        }

        let result = match input {
            Input::Tap => self.tap(),
            Input::Swipe { dx } => match classify_swipe(dx, self.config.swipe_threshold) {
                Gesture::Tap => self.tap(),
                Gesture::Swipe(direction) => self.step(direction),
            },
            Input::Key { key } => match key_direction(&key) {
                Some(direction) => self.step(direction),
                None => Err(CarouselError::Ignored(format!("unmapped key `{key}`"))),
            },
            Input::Dot { index } => self.controller.goto(index, self.clock.as_ref()),
            Input::SelectSlot { slot } => match self.draw.as_mut() {
                Some(draw) => draw.select_slot(slot, self.clock.as_ref()),
                None => Err(CarouselError::Ignored("bubble has no cards".to_owned())),
            },
            Input::PressButton { layer } => self.press_button(layer, host),
            Input::ToggleAudio { layer } => match self.audio.get_mut(&layer) {
                Some(playback) => {
                    playback.toggle();
                    Ok(())
                }
                None => Err(CarouselError::Ignored("layer is not audio".to_owned())),
            },
            Input::SeekAudio { layer, position_ms } => match self.audio.get_mut(&layer) {
                Some(playback) => {
                    playback.seek(position_ms);
                    Ok(())
                }
                None => Err(CarouselError::Ignored("layer is not audio".to_owned())),
            },
            Input::Restart => {
                self.restart();
                Ok(())
            }
        };

        match result {
            Ok(()) => trace!(command, "input applied"),
            Err(CarouselError::Ignored(reason)) => debug!(command, %reason, "input ignored"),
            Err(e) => warn!(command, error = %e, "input failed"),
        }
        self.process(host);
    }

    /// Moves virtual time forward by `elapsed_ms`, firing every timer that
    /// falls due, including timers scheduled by earlier firings in the same
    /// window.
    pub fn advance_time(&mut self, elapsed_ms: u64, host: &mut dyn CarouselHost) {
        let until = self.timers.now_ms().saturating_add(elapsed_ms);
        while let Some(timer) = self.timers.pop_due(until) {
            self.tick_audio();
            self.fire(timer);
            self.process(host);
        }
        self.timers.advance_to(until);
        self.tick_audio();
    }

    fn tap(&mut self) -> Result<(), CarouselError> {
        match self.draw.as_mut() {
            Some(draw) if draw.phase() == DrawPhase::Showing => draw.advance(self.clock.as_ref()),
            _ => Err(CarouselError::Ignored("nothing to page".to_owned())),
        }
    }

    fn step(&mut self, direction: Direction) -> Result<(), CarouselError> {
        match direction {
            Direction::Next => self.controller.go_to_next(self.clock.as_ref()),
            Direction::Prev => self.controller.go_to_prev(self.clock.as_ref()),
        }
    }

    fn press_button(&mut self, layer: usize, host: &mut dyn CarouselHost) -> Result<(), CarouselError> {
        let action = self
            .current_bubble()
            .and_then(|bubble| bubble.button_layer(layer))
            .map(|button| button.action.clone())
            .ok_or_else(|| CarouselError::Ignored("layer is not a button".to_owned()))?;

        match self.controller.dispatch_button(&action, self.clock.as_ref())? {
            ButtonOutcome::Postback { data, .. } => host.postback(&data),
            ButtonOutcome::Route { path } => host.route(&path),
            ButtonOutcome::External { uri, new_tab } => host.open_external(&uri, new_tab),
            ButtonOutcome::Navigated { .. } | ButtonOutcome::CooldownStarted { .. } => {}
        }
        Ok(())
    }

    fn restart(&mut self) {
        let dropped = self.timers.clear();
        self.generation += 1;
        info!(
            session_id = %self.session_id,
            generation = self.generation,
            dropped_timers = dropped,
            "carousel restarted"
        );
        self.controller.restart(self.clock.as_ref());
        match self.draw.as_mut() {
            Some(draw) if draw.bubble() == 0 => draw.reset(self.clock.as_ref()),
            _ => self.draw = None,
        }
    }

    fn schedule(&mut self, event: TimerEvent, after_ms: u64) {
        let timer = ScheduledTimer {
            generation: self.generation,
            event,
        };
        let id = self.timers.schedule(timer, after_ms);
        trace!(?id, ?event, after_ms, "timer scheduled");
    }

    fn fire(&mut self, timer: ScheduledTimer) {
        if timer.generation != self.generation {
            debug!(event = ?timer.event, "stale timer dropped");
            return;
        }

        let clock = self.clock.as_ref();
        let result = match timer.event {
            TimerEvent::FlipElapsed { bubble, slot } => match self.draw.as_mut() {
                Some(draw) if draw.bubble() == bubble => draw.finish_flip(slot, clock),
                _ => Err(CarouselError::Ignored("draw has moved on".to_owned())),
            },
            TimerEvent::DrawSettled { bubble } => match self.draw.as_mut() {
                Some(draw) if draw.bubble() == bubble => draw.settle(clock),
                _ => Err(CarouselError::Ignored("draw has moved on".to_owned())),
            },
            TimerEvent::AutoAdvance { from } => self.controller.auto_advance(from, clock),
            TimerEvent::CooldownExpired { bubble, target } => {
                self.controller.end_cooldown(bubble, target, clock)
            }
        };
        if let Err(e) = result {
            debug!(event = ?timer.event, error = %e, "timer had no effect");
        }
    }

    /// Drains recorded events until every component is quiescent.
    fn process(&mut self, host: &mut dyn CarouselHost) {
        loop {
            let draw_events = self
                .draw
                .as_mut()
                .map(|draw| draw.take_uncommitted_events())
                .unwrap_or_default();
            let navigation_events = self.controller.take_uncommitted_events();
            if draw_events.is_empty() && navigation_events.is_empty() {
                break;
            }
            for event in draw_events {
                self.on_draw_event(&event, host);
            }
            for event in navigation_events {
                self.on_navigation_event(&event, host);
            }
        }
    }

    fn on_draw_event(&mut self, event: &CardDrawEvent, host: &mut dyn CarouselHost) {
        trace!(event_type = %event.metadata.event_type, "card draw event");
        match &event.kind {
            CardDrawEventKind::SlotSelected(payload) => self.schedule(
                TimerEvent::FlipElapsed {
                    bubble: payload.bubble,
                    slot: payload.slot,
                },
                self.config.flip_delay_ms,
            ),
            CardDrawEventKind::SlotRevealed(payload) if payload.completes_draw() => self.schedule(
                TimerEvent::DrawSettled {
                    bubble: payload.bubble,
                },
                self.config.draw_settle_delay_ms,
            ),
            CardDrawEventKind::AllDrawn(payload) => host.all_drawn(payload.bubble),
            CardDrawEventKind::BubbleCompleted(payload) => {
                if let Err(e) = self
                    .controller
                    .on_card_draw_complete(payload.bubble, self.clock.as_ref())
                {
                    debug!(bubble = payload.bubble, error = %e, "completion not applied");
                }
            }
            CardDrawEventKind::SlotRevealed(_)
            | CardDrawEventKind::PageAdvanced(_)
            | CardDrawEventKind::Reset(_) => {}
        }
    }

    fn on_navigation_event(&mut self, event: &NavigationEvent, host: &mut dyn CarouselHost) {
        trace!(event_type = %event.metadata.event_type, "navigation event");
        match &event.kind {
            NavigationEventKind::Navigated(_) | NavigationEventKind::Restarted(_) => {
                self.enter_current_bubble();
            }
            NavigationEventKind::AdvanceScheduled(payload) => self.schedule(
                TimerEvent::AutoAdvance { from: payload.from },
                payload.delay_ms,
            ),
            NavigationEventKind::CooldownStarted(payload) => self.schedule(
                TimerEvent::CooldownExpired {
                    bubble: payload.bubble,
                    target: payload.target,
                },
                payload.duration_ms,
            ),
            NavigationEventKind::SessionCompleted(_) => host.complete(),
            NavigationEventKind::CardBubbleCompleted(_) | NavigationEventKind::CooldownEnded(_) => {}
        }
    }

    /// Brings the draw and audio in line with the current bubble.
    fn enter_current_bubble(&mut self) {
        let index = self.controller.current_index();
        let Some(bubble) = self.document.bubble(index) else {
            self.draw = None;
            self.audio.clear();
            return;
        };

        self.audio = bubble
            .layers()
            .iter()
            .enumerate()
            .filter_map(|(layer_index, layer)| match layer {
                Layer::Audio(audio) => Some((layer_index, AudioPlayback::for_layer(audio))),
                _ => None,
            })
            .collect();
        self.audio_synced_ms = self.timers.now_ms();

        let has_cards = bubble.has_cards();
        if self.draw.as_ref().is_some_and(|draw| draw.bubble() == index) {
            return;
        }
        self.draw = has_cards.then(|| {
            CardDraw::start(
                self.session_id,
                index,
                &self.cards,
                self.config.deck_size,
                self.clock.as_ref(),
            )
        });
    }

    fn tick_audio(&mut self) {
        let now = self.timers.now_ms();
        let elapsed = now.saturating_sub(self.audio_synced_ms);
        if elapsed > 0 {
            for playback in self.audio.values_mut() {
                playback.tick(elapsed);
            }
        }
        self.audio_synced_ms = now;
    }
}
