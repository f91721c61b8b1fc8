//! Read-only view of a running carousel, everything a render surface needs
//! for one frame.

use carousel_compositor::application::compose::{LayerDescriptor, compose};
use carousel_compositor::domain::audio::AudioPlayback;
use carousel_document::domain::model::Bubble;
use carousel_draw::application::query_handlers::{DrawView, draw_view};
use carousel_navigation::application::query_handlers::{NavigationView, navigation_view};
use serde::Serialize;

use crate::application::carousel::Carousel;

/// Step progress for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    /// Zero-based current step.
    pub current: usize,
    /// Total steps.
    pub total: usize,
    /// `"N / total"`.
    pub label: String,
}

/// Playback of one audio layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioView {
    /// Hero layer index.
    pub layer: usize,
    /// Playback state.
    #[serde(flatten)]
    pub playback: AudioPlayback,
}

/// Read-only view of a carousel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselView {
    /// Index of the bubble shown.
    pub bubble_index: usize,
    /// The bubble shown, for body and footer rendering.
    pub bubble: Bubble,
    /// Hero layers in paint order.
    pub layers: Vec<LayerDescriptor>,
    /// Navigation state.
    pub navigation: NavigationView,
    /// Step progress.
    pub progress: ProgressView,
    /// Card draw of the bubble, if it has cards.
    pub draw: Option<DrawView>,
    /// Audio layers of the bubble.
    pub audio: Vec<AudioView>,
    /// Virtual time in milliseconds.
    pub clock_ms: u64,
    /// Timers waiting to fire.
    pub pending_timers: usize,
}

/// Builds the view of `carousel`; `None` for an empty document.
#[must_use]
pub fn carousel_view(carousel: &Carousel) -> Option<CarouselView> {
    let bubble = carousel.current_bubble()?;
    let progress = carousel.progress();

    Some(CarouselView {
        bubble_index: carousel.controller().current_index(),
        bubble: bubble.clone(),
        layers: compose(bubble.layers()),
        navigation: navigation_view(carousel.controller()),
        progress: ProgressView {
            current: progress.current,
            total: progress.total,
            label: progress.label(),
        },
        draw: carousel
            .draw()
            .map(|draw| draw_view(draw, carousel.card_back())),
        audio: carousel
            .audio()
            .iter()
            .map(|(layer, playback)| AudioView {
                layer: *layer,
                playback: playback.clone(),
            })
            .collect(),
        clock_ms: carousel.now_ms(),
        pending_timers: carousel.pending_timers(),
    })
}
