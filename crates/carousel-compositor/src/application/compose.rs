//! Composes a layered hero into ordered render descriptors.

use carousel_document::domain::layer::{Action, Layer};
use serde::Serialize;
use tracing::trace;

use crate::domain::button::{ButtonPaint, resolve_button_paint};
use crate::domain::placement::{Placement, place};
use crate::domain::text::{TextStyle, resolve_text_style};

/// Variant-specific paint of a layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerPaint {
    /// Image source.
    Image {
        /// Image URL.
        url: String,
        /// Accessible description.
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    /// Styled text.
    Text {
        /// Text content.
        text: String,
        /// Resolved style.
        style: TextStyle,
    },
    /// Pressable button.
    Button {
        /// Caption.
        label: String,
        /// Resolved paint.
        paint: ButtonPaint,
        /// Action dispatched on press.
        action: Action,
    },
    /// Audio control.
    Audio {
        /// Audio source.
        src: String,
        /// Control caption.
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Slot for the card-draw surface.
    Cards,
}

/// Everything the render surface needs to draw one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDescriptor {
    /// Index of the layer in the document; used to address presses.
    pub layer_index: usize,
    /// Paint order.
    pub z_index: i32,
    /// Anchor-resolved placement.
    pub placement: Placement,
    /// CSS width, if sized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// CSS height, if sized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Opacity clamped to `[0, 1]`.
    pub opacity: f32,
    /// Variant-specific paint.
    pub paint: LayerPaint,
}

fn clamp_opacity(opacity: Option<f32>) -> f32 {
    match opacity {
        Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
        _ => 1.0,
    }
}

fn paint_of(layer: &Layer) -> LayerPaint {
    match layer {
        Layer::Image(image) => LayerPaint::Image {
            url: image.url.clone(),
            alt: image.alt.clone(),
        },
        Layer::Text(text) => LayerPaint::Text {
            text: text.text.clone(),
            style: resolve_text_style(text),
        },
        Layer::Button(button) => LayerPaint::Button {
            label: button.label.clone(),
            paint: resolve_button_paint(button),
            action: button.action.clone(),
        },
        Layer::Audio(audio) => LayerPaint::Audio {
            src: audio.src.clone(),
            label: audio.label.clone(),
        },
        Layer::Cards(_) => LayerPaint::Cards,
    }
}

/// Describes a single layer.
#[must_use]
pub fn describe(layer_index: usize, layer: &Layer) -> LayerDescriptor {
    let frame = layer.frame();
    let size = frame.size.unwrap_or_default();
    LayerDescriptor {
        layer_index,
        z_index: frame.z_index,
        placement: place(layer),
        width: size.width.map(|width| width.css()),
        height: size.height.map(|height| height.css()),
        opacity: clamp_opacity(frame.opacity),
        paint: paint_of(layer),
    }
}

/// Describes every layer in paint order: ascending `zIndex`, ties kept in
/// document order.
#[must_use]
pub fn compose(layers: &[Layer]) -> Vec<LayerDescriptor> {
    let mut descriptors: Vec<LayerDescriptor> = layers
        .iter()
        .enumerate()
        .map(|(index, layer)| describe(index, layer))
        .collect();
    // `sort_by_key` is stable.
    descriptors.sort_by_key(|descriptor| descriptor.z_index);
    trace!(layers = descriptors.len(), "composed hero layers");
    descriptors
}
