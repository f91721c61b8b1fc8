//! Classification of raw pointer and keyboard input.

use serde::{Deserialize, Serialize};

/// Direction of a navigation gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Towards the next bubble.
    Next,
    /// Towards the previous bubble.
    Prev,
}

/// What a horizontal pointer movement amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Movement below the swipe threshold.
    Tap,
    /// A swipe in a direction.
    Swipe(Direction),
}

/// Classifies a pointer movement of `dx` pixels.
///
/// `|dx| >= threshold` is a swipe; a leftward swipe (`dx < 0`) means next.
#[must_use]
pub fn classify_swipe(dx: f32, threshold: f32) -> Gesture {
    if !dx.is_finite() || dx.abs() < threshold {
        return Gesture::Tap;
    }
    if dx < 0.0 {
        Gesture::Swipe(Direction::Next)
    } else {
        Gesture::Swipe(Direction::Prev)
    }
}

/// Maps a keyboard key name to a direction.
#[must_use]
pub fn key_direction(key: &str) -> Option<Direction> {
    match key {
        "ArrowRight" => Some(Direction::Next),
        "ArrowLeft" => Some(Direction::Prev),
        _ => None,
    }
}
