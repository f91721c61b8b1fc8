//! Text layer style resolution.

use carousel_document::domain::layer::{
    FontSize, FontWeight, Shadow, TextAlign, TextLayer, VerticalAlign,
};
use serde::Serialize;

/// Text color when a layer does not set one. Hero text sits on imagery.
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
/// Size used for unknown size names.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;
/// Weight used for unknown weight names.
pub const DEFAULT_FONT_WEIGHT: u16 = 400;

/// Outline paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokePaint {
    /// Width in pixels.
    pub width: f32,
    /// Color.
    pub color: String,
}

/// Fully resolved text style handed to the render surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    /// Concrete size in pixels.
    pub font_size_px: f32,
    /// Numeric weight, 100–900.
    pub font_weight: u16,
    /// Text color.
    pub color: String,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub vertical_align: VerticalAlign,
    /// Outline, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<StrokePaint>,
    /// CSS `text-shadow`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
    /// Box background, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Inner padding in pixels.
    pub padding_px: f32,
}

/// Maps a size name of the scale to pixels.
#[must_use]
pub fn named_size_px(name: &str) -> Option<f32> {
    let px = match name {
        "xxs" => 11.0,
        "xs" => 13.0,
        "sm" => 14.0,
        "md" => 16.0,
        "lg" => 19.0,
        "xl" => 22.0,
        "xxl" => 29.0,
        "3xl" => 35.0,
        "4xl" => 48.0,
        "5xl" => 74.0,
        _ => return None,
    };
    Some(px)
}

/// Resolves a layer's size to pixels, falling back to `md`.
#[must_use]
pub fn resolve_font_size(size: Option<&FontSize>) -> f32 {
    match size {
        None => DEFAULT_FONT_SIZE_PX,
        Some(FontSize::Px(px)) if px.is_finite() && *px > 0.0 => *px,
        Some(FontSize::Px(_)) => DEFAULT_FONT_SIZE_PX,
        Some(FontSize::Named(name)) => {
            let name = name.trim();
            named_size_px(name)
                .or_else(|| {
                    name.strip_suffix("px")
                        .and_then(|n| n.trim().parse::<f32>().ok())
                        .filter(|px| px.is_finite() && *px > 0.0)
                })
                .unwrap_or(DEFAULT_FONT_SIZE_PX)
        }
    }
}

fn clamp_weight(weight: u16) -> u16 {
    weight.clamp(100, 900)
}

/// Resolves a layer's weight to a numeric CSS weight.
#[must_use]
pub fn resolve_font_weight(weight: Option<&FontWeight>) -> u16 {
    match weight {
        None => DEFAULT_FONT_WEIGHT,
        Some(FontWeight::Numeric(n)) => clamp_weight(*n),
        Some(FontWeight::Named(name)) => match name.trim() {
            "thin" => 100,
            "light" => 300,
            "regular" | "normal" => 400,
            "medium" => 500,
            "semibold" => 600,
            "bold" => 700,
            "extrabold" => 800,
            "black" => 900,
            other => other
                .parse::<u16>()
                .map_or(DEFAULT_FONT_WEIGHT, clamp_weight),
        },
    }
}

fn shadow_css(shadow: &Shadow) -> String {
    format!(
        "{}px {}px {}px {}",
        shadow.x, shadow.y, shadow.blur, shadow.color
    )
}

/// Resolves every optional style of a text layer.
#[must_use]
pub fn resolve_text_style(layer: &TextLayer) -> TextStyle {
    TextStyle {
        font_size_px: resolve_font_size(layer.font_size.as_ref()),
        font_weight: resolve_font_weight(layer.font_weight.as_ref()),
        color: layer
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_owned()),
        align: layer.align,
        vertical_align: layer.vertical_align,
        stroke: layer.stroke.as_ref().map(|stroke| StrokePaint {
            width: stroke.width.max(0.0),
            color: stroke.color.clone(),
        }),
        shadow: layer.shadow.as_ref().map(shadow_css),
        background_color: layer.background_color.clone(),
        padding_px: layer.padding.filter(|p| p.is_finite()).unwrap_or(0.0).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use carousel_document::domain::layer::Layer;
    use serde_json::json;

    use super::*;

    fn text_layer(raw: serde_json::Value) -> TextLayer {
        match serde_json::from_value(raw).unwrap() {
            Layer::Text(text) => text,
            other => panic!("expected text layer, got {other:?}"),
        }
    }

    #[test]
    fn test_named_sizes_follow_the_scale() {
        let sizes: Vec<f32> = ["xxs", "xs", "sm", "md", "lg", "xl", "xxl", "3xl", "4xl", "5xl"]
            .iter()
            .map(|name| resolve_font_size(Some(&FontSize::Named((*name).to_owned()))))
            .collect();

        assert_eq!(
            sizes,
            vec![11.0, 13.0, 14.0, 16.0, 19.0, 22.0, 29.0, 35.0, 48.0, 74.0]
        );
    }

    #[test]
    fn test_pixel_sizes_pass_through_and_unknown_falls_back() {
        assert_eq!(resolve_font_size(Some(&FontSize::Px(20.0))), 20.0);
        assert_eq!(resolve_font_size(Some(&FontSize::Named("18px".to_owned()))), 18.0);
        assert_eq!(resolve_font_size(Some(&FontSize::Named("huge".to_owned()))), 16.0);
        assert_eq!(resolve_font_size(None), 16.0);
    }

    #[test]
    fn test_weights_resolve_names_and_clamp_numbers() {
        assert_eq!(resolve_font_weight(Some(&FontWeight::Named("bold".to_owned()))), 700);
        assert_eq!(resolve_font_weight(Some(&FontWeight::Named("semibold".to_owned()))), 600);
        assert_eq!(resolve_font_weight(Some(&FontWeight::Named("650".to_owned()))), 650);
        assert_eq!(resolve_font_weight(Some(&FontWeight::Numeric(1200))), 900);
        assert_eq!(resolve_font_weight(Some(&FontWeight::Named("heavy-ish".to_owned()))), 400);
        assert_eq!(resolve_font_weight(None), 400);
    }

    #[test]
    fn test_resolve_text_style_fills_optional_decorations() {
        // Arrange
        let layer = text_layer(json!({
            "type": "text",
            "text": "The Hermit",
            "fontSize": "xl",
            "fontWeight": "bold",
            "stroke": { "width": 2, "color": "#000" },
            "shadow": { "x": 1, "y": 1, "blur": 3, "color": "#333" },
            "backgroundColor": "#00000080",
            "padding": 8,
            "verticalAlign": "bottom",
            "align": "center"
        }));

        // Act
        let style = resolve_text_style(&layer);

        // Assert
        assert_eq!(style.font_size_px, 22.0);
        assert_eq!(style.font_weight, 700);
        assert_eq!(style.color, DEFAULT_TEXT_COLOR);
        assert_eq!(
            style.stroke,
            Some(StrokePaint {
                width: 2.0,
                color: "#000".to_owned()
            })
        );
        assert_eq!(style.shadow.as_deref(), Some("1px 1px 3px #333"));
        assert_eq!(style.background_color.as_deref(), Some("#00000080"));
        assert_eq!(style.padding_px, 8.0);
        assert_eq!(style.vertical_align, VerticalAlign::Bottom);
        assert_eq!(style.align, TextAlign::Center);
    }

    #[test]
    fn test_plain_text_has_no_decorations() {
        let style = resolve_text_style(&text_layer(json!({ "type": "text", "text": "x" })));

        assert!(style.stroke.is_none());
        assert!(style.shadow.is_none());
        assert_eq!(style.padding_px, 0.0);
        assert_eq!(style.vertical_align, VerticalAlign::Top);
    }
}
