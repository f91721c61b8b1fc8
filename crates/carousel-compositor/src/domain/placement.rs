//! Anchor resolution and transform composition.

use carousel_document::domain::layer::{Anchor, Layer};
use serde::Serialize;

/// Screen-space placement of one layer inside its hero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    /// Container-relative left edge of the anchor point, percent.
    pub left_pct: f32,
    /// Container-relative top edge of the anchor point, percent.
    pub top_pct: f32,
    /// Self-relative horizontal shift applied by the anchor, percent.
    pub offset_x_pct: f32,
    /// Self-relative vertical shift applied by the anchor, percent.
    pub offset_y_pct: f32,
    /// Composed CSS transform: translate, then rotate, then scale.
    pub transform: String,
}

/// Self-relative translation that puts the anchor point of the layer's box
/// on its position.
#[must_use]
pub fn anchor_offset(anchor: Anchor) -> (f32, f32) {
    let x = match anchor {
        Anchor::TopLeft | Anchor::CenterLeft | Anchor::BottomLeft => 0.0,
        Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => -50.0,
        Anchor::TopRight | Anchor::CenterRight | Anchor::BottomRight => -100.0,
    };
    let y = match anchor {
        Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => 0.0,
        Anchor::CenterLeft | Anchor::Center | Anchor::CenterRight => -50.0,
        Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => -100.0,
    };
    (x, y)
}

/// Rotation honoured for the layer: image and text layers only.
fn rotation_of(layer: &Layer) -> Option<f32> {
    match layer {
        Layer::Image(image) => image.rotation,
        Layer::Text(text) => text.rotation,
        Layer::Button(_) | Layer::Audio(_) | Layer::Cards(_) => None,
    }
}

/// Scale honoured for the layer: image layers only.
fn scale_of(layer: &Layer) -> Option<f32> {
    match layer {
        Layer::Image(image) => image.frame.size.and_then(|size| size.scale),
        _ => None,
    }
}

/// Computes the placement of a layer. Pure.
#[must_use]
pub fn place(layer: &Layer) -> Placement {
    let position = layer.frame().position;
    let (offset_x_pct, offset_y_pct) = anchor_offset(position.anchor);

    let mut transform = format!("translate({offset_x_pct}%, {offset_y_pct}%)");
    if let Some(degrees) = rotation_of(layer) {
        transform.push_str(&format!(" rotate({degrees}deg)"));
    }
    if let Some(scale) = scale_of(layer) {
        transform.push_str(&format!(" scale({scale})"));
    }

    Placement {
        left_pct: position.x,
        top_pct: position.y,
        offset_x_pct,
        offset_y_pct,
        transform,
    }
}
