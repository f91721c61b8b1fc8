//! Read-only view of the navigation controller.

use carousel_core::aggregate::AggregateRoot;
use serde::Serialize;

use crate::domain::aggregates::NavigationController;

/// Read-only view of navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    /// Bubble being shown.
    pub current_index: usize,
    /// Number of bubbles.
    pub bubble_count: usize,
    /// Whether gestures are blocked on the current bubble.
    pub is_locked: bool,
    /// Whether a next gesture would move.
    pub can_go_next: bool,
    /// Whether a previous gesture would move.
    pub can_go_prev: bool,
    /// Whether backward navigation is disabled for the session.
    pub is_one_directional: bool,
    /// Card bubbles whose flow finished.
    pub completed_card_bubbles: Vec<usize>,
    /// Bubbles cooling down.
    pub cooldown_bubbles: Vec<usize>,
    /// Whether the session completed.
    pub completed: bool,
    /// Number of events applied.
    pub version: i64,
}

/// Builds the view of `controller`.
#[must_use]
pub fn navigation_view(controller: &NavigationController) -> NavigationView {
    let state = controller.state();
    NavigationView {
        current_index: state.current_index,
        bubble_count: controller.len(),
        is_locked: controller.is_locked(state.current_index),
        can_go_next: controller.can_go_next(),
        can_go_prev: controller.can_go_prev(),
        is_one_directional: controller.is_one_directional(),
        completed_card_bubbles: state.completed_card_bubbles.iter().copied().collect(),
        cooldown_bubbles: state.cooldown_bubbles.iter().copied().collect(),
        completed: state.completed,
        version: controller.version(),
    }
}
