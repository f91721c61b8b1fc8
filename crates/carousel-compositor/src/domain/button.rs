//! Button layer paint resolution.

use carousel_document::domain::layer::{ButtonLayer, ButtonVariant};
use serde::Serialize;

/// Accent color when a button does not set one.
pub const DEFAULT_ACCENT: &str = "#17c950";
/// Label color on filled buttons.
pub const SOLID_LABEL_COLOR: &str = "#ffffff";

/// Resolved paint of a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonPaint {
    /// Fill color, `transparent` for outline buttons.
    pub background: String,
    /// Border color, outline buttons only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// Label color.
    pub text_color: String,
}

/// Maps the button variant and colors to paint.
#[must_use]
pub fn resolve_button_paint(button: &ButtonLayer) -> ButtonPaint {
    let accent = button
        .color
        .clone()
        .unwrap_or_else(|| DEFAULT_ACCENT.to_owned());

    match button.variant {
        ButtonVariant::Solid => ButtonPaint {
            background: accent,
            border: None,
            text_color: button
                .text_color
                .clone()
                .unwrap_or_else(|| SOLID_LABEL_COLOR.to_owned()),
        },
        ButtonVariant::Outline => ButtonPaint {
            background: "transparent".to_owned(),
            text_color: button.text_color.clone().unwrap_or_else(|| accent.clone()),
            border: Some(accent),
        },
    }
}
