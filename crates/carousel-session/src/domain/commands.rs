//! Inputs a carousel session accepts.

use carousel_core::command::Command;
use serde::{Deserialize, Serialize};

/// One user interaction with a carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    /// A tap on the carousel surface; pages the card interpretation.
    Tap,
    /// A horizontal pointer movement of `dx` pixels.
    Swipe {
        /// Horizontal delta; negative is leftward.
        dx: f32,
    },
    /// A keyboard key, e.g. `ArrowRight`.
    Key {
        /// Key name.
        key: String,
    },
    /// A progress dot.
    Dot {
        /// Target bubble.
        index: usize,
    },
    /// A face-down deck slot.
    SelectSlot {
        /// Deck slot.
        slot: usize,
    },
    /// A button layer of the current bubble.
    PressButton {
        /// Hero layer index.
        layer: usize,
    },
    /// An audio layer's play/pause control.
    ToggleAudio {
        /// Hero layer index.
        layer: usize,
    },
    /// Moves an audio layer's playhead.
    SeekAudio {
        /// Hero layer index.
        layer: usize,
        /// Target position, clamped to the track length.
        position_ms: u64,
    },
    /// Start the session over.
    Restart,
}

impl Command for Input {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Tap => "carousel.tap",
            Self::Swipe { .. } => "carousel.swipe",
            Self::Key { .. } => "carousel.key",
            Self::Dot { .. } => "carousel.dot",
            Self::SelectSlot { .. } => "carousel.select_slot",
            Self::PressButton { .. } => "carousel.press_button",
            Self::ToggleAudio { .. } => "carousel.toggle_audio",
            Self::SeekAudio { .. } => "carousel.seek_audio",
            Self::Restart => "carousel.restart",
        }
    }
}
