//! Hero layers: the positioned visual elements of a layered hero.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Named reference point of a layer, one cell of the 3×3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Top-left corner (default).
    #[default]
    TopLeft,
    /// Middle of the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Middle of the left edge.
    CenterLeft,
    /// Box center.
    Center,
    /// Middle of the right edge.
    CenterRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Middle of the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// All nine anchors, row by row.
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterLeft,
        Self::Center,
        Self::CenterRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];
}

/// Where a layer sits inside its hero, in percent of the container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    /// Horizontal position, percent of container width.
    pub x: f32,
    /// Vertical position, percent of container height.
    pub y: f32,
    /// Which point of the layer lands on `(x, y)`.
    pub anchor: Anchor,
}

/// A length given either as percent of the container or in pixels.
///
/// On the wire a bare number is pixels, `"NN%"` is a percentage and
/// `"NNpx"` is pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Percentage of the container dimension.
    Percent(f32),
    /// Absolute pixels.
    Px(f32),
}

impl Length {
    /// CSS rendering of the length, e.g. `50%` or `120px`.
    #[must_use]
    pub fn css(&self) -> String {
        match self {
            Self::Percent(v) => format!("{v}%"),
            Self::Px(v) => format!("{v}px"),
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(number) = raw.strip_suffix('%') {
            return number.trim().parse().ok().map(Self::Percent);
        }
        let number = raw.strip_suffix("px").unwrap_or(raw);
        number.trim().parse().ok().map(Self::Px)
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Percent(v) => serializer.serialize_str(&format!("{v}%")),
            Self::Px(v) => serializer.serialize_f32(*v),
        }
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Self::Px(v)),
            Raw::Text(text) => Self::parse(&text)
                .ok_or_else(|| de::Error::custom(format!("invalid length `{text}`"))),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// Optional explicit box size of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Size {
    /// Box width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    /// Box height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    /// Uniform scale factor (image layers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

fn default_z_index() -> i32 {
    1
}

/// Fields shared by every layer variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFrame {
    /// Placement inside the hero.
    #[serde(default)]
    pub position: Position,
    /// Optional explicit size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    /// Opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Paint order; higher draws later.
    #[serde(default = "default_z_index")]
    pub z_index: i32,
}

impl Default for LayerFrame {
    fn default() -> Self {
        Self {
            position: Position::default(),
            size: None,
            opacity: None,
            z_index: default_z_index(),
        }
    }
}

/// Text size: a named step of the size scale or literal pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontSize {
    /// Literal pixel size.
    Px(f32),
    /// Named size (`xs`, `md`, `3xl`, …) or a `"NNpx"` string.
    Named(String),
}

/// Text weight: a named weight or a numeric CSS weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    /// Numeric weight, e.g. 600.
    Numeric(u16),
    /// Named weight (`regular`, `bold`, …) or a numeric string.
    Named(String),
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Start-aligned (default).
    #[default]
    Start,
    /// Centered.
    Center,
    /// End-aligned.
    End,
}

/// Vertical text alignment inside the layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Top (default).
    #[default]
    Top,
    /// Middle.
    Center,
    /// Bottom.
    Bottom,
}

/// Text outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Outline width in pixels.
    pub width: f32,
    /// Outline color.
    pub color: String,
}

/// Text drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    /// Horizontal offset in pixels.
    pub x: f32,
    /// Vertical offset in pixels.
    pub y: f32,
    /// Blur radius in pixels.
    pub blur: f32,
    /// Shadow color.
    pub color: String,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 2.0,
            blur: 4.0,
            color: "rgba(0,0,0,0.5)".to_owned(),
        }
    }
}

/// Paint style of a button layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Filled background (default).
    #[default]
    Solid,
    /// Transparent background with a colored border.
    Outline,
}

/// What a button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Move to the next bubble.
    Next,
    /// Move to the previous bubble.
    Prev,
    /// Jump to a bubble index.
    Goto {
        /// Target bubble index.
        index: usize,
    },
    /// Send opaque data to the host.
    Postback {
        /// Payload forwarded verbatim.
        data: String,
        /// Optional text the host may echo.
        #[serde(rename = "displayText", default, skip_serializing_if = "Option::is_none")]
        display_text: Option<String>,
    },
    /// Navigate to a location.
    Uri {
        /// Internal path or external URL.
        uri: String,
        /// Open in a new surface instead of the current one.
        #[serde(rename = "openInNewTab", default)]
        open_in_new_tab: bool,
    },
}

/// An image layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    /// Shared placement fields.
    #[serde(flatten)]
    pub frame: LayerFrame,
    /// Image source.
    pub url: String,
    /// Rotation in degrees, clockwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    /// Accessible description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Shared placement fields.
    #[serde(flatten)]
    pub frame: LayerFrame,
    /// Text content.
    pub text: String,
    /// Size step or pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    /// Weight name or number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Vertical alignment inside the box.
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    /// Rotation in degrees, clockwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    /// Outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    /// Drop shadow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Box background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Inner padding in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
}

/// A button layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonLayer {
    /// Shared placement fields.
    #[serde(flatten)]
    pub frame: LayerFrame,
    /// Button caption.
    pub label: String,
    /// Paint style.
    #[serde(default)]
    pub variant: ButtonVariant,
    /// Accent color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Caption color override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Dispatched on press.
    pub action: Action,
}

/// An audio layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioLayer {
    /// Shared placement fields.
    #[serde(flatten)]
    pub frame: LayerFrame,
    /// Audio source.
    pub src: String,
    /// Start playing when the bubble becomes active.
    #[serde(default)]
    pub autoplay: bool,
    /// Restart from the beginning at the end.
    #[serde(rename = "loop", default)]
    pub looping: bool,
    /// Track length, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Control caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Placeholder layer hosting the card-draw surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsLayer {
    /// Shared placement fields.
    #[serde(flatten)]
    pub frame: LayerFrame,
}

/// One visual element of a layered hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    /// Positioned image.
    Image(ImageLayer),
    /// Styled text.
    Text(TextLayer),
    /// Pressable button.
    Button(ButtonLayer),
    /// Audio control.
    Audio(AudioLayer),
    /// Embedded card-draw surface.
    Cards(CardsLayer),
}

impl Layer {
    /// Shared placement fields of any variant.
    #[must_use]
    pub fn frame(&self) -> &LayerFrame {
        match self {
            Self::Image(layer) => &layer.frame,
            Self::Text(layer) => &layer.frame,
            Self::Button(layer) => &layer.frame,
            Self::Audio(layer) => &layer.frame,
            Self::Cards(layer) => &layer.frame,
        }
    }

    /// Wire name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Text(_) => "text",
            Self::Button(_) => "button",
            Self::Audio(_) => "audio",
            Self::Cards(_) => "cards",
        }
    }
}
