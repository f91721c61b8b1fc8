//! Documents, bubbles and their sections.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::layer::{Action, ButtonLayer, Layer};

/// Body `content` value that embeds the card-draw flow.
pub const CARDS_CONTENT: &str = "cards";

/// A plain image hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageHero {
    /// Image source.
    pub url: String,
    /// Aspect ratio such as `"1:1"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// `cover` or `fit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_mode: Option<String>,
}

/// A composite hero built from stacked layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayeredHero {
    /// Aspect ratio such as `"3:4"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Container background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Layers in document order. A malformed layer is dropped on its own.
    #[serde(default, deserialize_with = "lenient_layers")]
    pub layers: Vec<Layer>,
}

fn lenient_layers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Layer>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            warn!("hero layers is not an array; ignoring it");
        }
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match Layer::deserialize(item) {
            Ok(layer) => Some(layer),
            Err(e) => {
                warn!(layer = index, error = %e, "dropping malformed hero layer");
                None
            }
        })
        .collect())
}

/// The top visual area of a bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Hero {
    /// Single image.
    Image(ImageHero),
    /// Layered composite.
    Layered(LayeredHero),
}

/// A text node in a body or footer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextNode {
    /// Text content.
    pub text: String,
    /// Named size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Named weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// `start`, `center` or `end`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    /// Wrap long lines.
    pub wrap: bool,
}

/// An image node in a body or footer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageNode {
    /// Image source.
    pub url: String,
    /// Named size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Aspect ratio such as `"1:1"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

/// A nested container node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxNode {
    /// `vertical`, `horizontal` or `baseline`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Named spacing between children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    /// Child nodes.
    pub contents: Vec<ContentNode>,
}

/// A button node in a body or footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonNode {
    /// Dispatched on press.
    pub action: Action,
    /// Caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// `primary`, `secondary` or `link`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Accent color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A horizontal rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparatorNode {
    /// Rule color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Flexible empty space.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerNode {
    /// Named size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Literal content rendered by the host's flex renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    /// Text.
    Text(TextNode),
    /// Image.
    Image(ImageNode),
    /// Container.
    Box(BoxNode),
    /// Button.
    Button(ButtonNode),
    /// Rule.
    Separator(SeparatorNode),
    /// Space.
    Spacer(SpacerNode),
}

/// A body or footer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    /// Special content marker; `"cards"` embeds the card draw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Layout of `contents`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    /// Section background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Literal content nodes.
    pub contents: Vec<ContentNode>,
}

impl Section {
    /// Returns `true` if this section embeds the card draw.
    #[must_use]
    pub fn is_cards(&self) -> bool {
        self.content.as_deref() == Some(CARDS_CONTENT)
    }
}

/// One screen of the carousel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bubble {
    /// Top visual area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Hero>,
    /// Main section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Section>,
    /// Bottom section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Section>,
    /// Lock applied after the bubble completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_ms: Option<u64>,
}

impl Bubble {
    /// Hero layers, empty unless the hero is layered.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        match &self.hero {
            Some(Hero::Layered(hero)) => &hero.layers,
            _ => &[],
        }
    }

    /// Body content is `"cards"` or any hero layer is a cards layer.
    #[must_use]
    pub fn has_cards(&self) -> bool {
        self.body.as_ref().is_some_and(Section::is_cards)
            || self.layers().iter().any(|layer| matches!(layer, Layer::Cards(_)))
    }

    /// Any hero layer is a button.
    #[must_use]
    pub fn has_buttons(&self) -> bool {
        self.layers()
            .iter()
            .any(|layer| matches!(layer, Layer::Button(_)))
    }

    /// Cooldown duration, only when strictly positive.
    #[must_use]
    pub fn cooldown(&self) -> Option<u64> {
        self.cooldown_ms.filter(|ms| *ms > 0)
    }

    /// Button layer at hero layer index `layer`.
    #[must_use]
    pub fn button_layer(&self, layer: usize) -> Option<&ButtonLayer> {
        match self.layers().get(layer) {
            Some(Layer::Button(button)) => Some(button),
            _ => None,
        }
    }

    /// Parses one bubble, dropping each part that fails on its own.
    fn from_value(index: usize, raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            warn!(bubble = index, "bubble is not an object; rendering it empty");
            return Self::default();
        };

        let cooldown_ms = match object.get("cooldownMs") {
            None | Some(Value::Null) => None,
            Some(value) => {
                let parsed = value.as_u64();
                if parsed.is_none() {
                    warn!(bubble = index, "ignoring cooldownMs that is not a non-negative integer");
                }
                parsed
            }
        };

        Self {
            hero: parse_part(index, "hero", object.get("hero")),
            body: parse_part(index, "body", object.get("body")),
            footer: parse_part(index, "footer", object.get("footer")),
            cooldown_ms,
        }
    }
}

fn parse_part<T: DeserializeOwned>(index: usize, part: &str, raw: Option<&Value>) -> Option<T> {
    let raw = raw.filter(|value| !value.is_null())?;
    match T::deserialize(raw) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(bubble = index, part, error = %e, "dropping malformed bubble part");
            None
        }
    }
}

/// An ordered sequence of bubbles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Bubbles in navigation order.
    #[serde(default)]
    pub contents: Vec<Bubble>,
}

impl Document {
    /// Builds a document from its bubbles.
    #[must_use]
    pub fn new(contents: Vec<Bubble>) -> Self {
        Self { contents }
    }

    /// Normalizes externally supplied JSON.
    ///
    /// Never fails: a missing or non-array `contents` is an empty document,
    /// non-object bubbles become empty bubbles (indices stay stable), and a
    /// malformed `hero`, `body` or `footer` is dropped on its own.
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        let Some(contents) = raw.get("contents").and_then(Value::as_array) else {
            warn!("document has no contents array; treating it as empty");
            return Self::default();
        };
        Self {
            contents: contents
                .iter()
                .enumerate()
                .map(|(index, bubble)| Bubble::from_value(index, bubble))
                .collect(),
        }
    }

    /// Number of bubbles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Returns `true` if there is no bubble.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Bubble at `index`.
    #[must_use]
    pub fn bubble(&self, index: usize) -> Option<&Bubble> {
        self.contents.get(index)
    }

    /// Index of the last bubble.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.contents.len().checked_sub(1)
    }

    /// Any bubble embeds a card draw. Makes the whole session one-directional.
    #[must_use]
    pub fn has_any_cards_bubble(&self) -> bool {
        self.contents.iter().any(Bubble::has_cards)
    }
}

#[cfg(test)]
mod tests {
    use carousel_test_support::fixtures;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_value_reads_bubbles_in_order() {
        // Arrange
        let raw = fixtures::document(vec![
            fixtures::plain_bubble("first"),
            fixtures::cards_body_bubble(),
            fixtures::button_bubble(json!({ "type": "next" })),
        ]);

        // Act
        let document = Document::from_value(&raw);

        // Assert
        assert_eq!(document.len(), 3);
        assert!(!document.contents[0].has_cards());
        assert!(document.contents[1].has_cards());
        assert!(document.contents[2].has_buttons());
        assert!(document.has_any_cards_bubble());
    }

    #[test]
    fn test_cards_layer_marks_bubble_as_cards() {
        let raw = fixtures::document(vec![fixtures::cards_layer_bubble()]);

        let document = Document::from_value(&raw);

        assert!(document.contents[0].has_cards());
        assert!(!document.contents[0].has_buttons());
    }

    #[test]
    fn test_missing_contents_is_empty_document() {
        let document = Document::from_value(&json!({ "title": "no bubbles" }));

        assert!(document.is_empty());
        assert_eq!(document.last_index(), None);
        assert!(!document.has_any_cards_bubble());
    }

    #[test]
    fn test_malformed_part_is_dropped_alone() {
        // Arrange
        let raw = json!({
            "contents": [{
                "hero": { "type": "hologram" },
                "body": { "contents": [{ "type": "text", "text": "still here" }] },
                "cooldownMs": 2000
            }]
        });

        // Act
        let document = Document::from_value(&raw);

        // Assert
        let bubble = &document.contents[0];
        assert!(bubble.hero.is_none());
        assert_eq!(bubble.body.as_ref().unwrap().contents.len(), 1);
        assert_eq!(bubble.cooldown(), Some(2000));
    }

    #[test]
    fn test_malformed_layer_is_dropped_alone() {
        // Arrange
        let layered = |layers: Value| json!({ "hero": { "type": "layered", "layers": layers } });
        let raw = json!({
            "contents": [
                layered(json!([{ "type": "cards" }, { "type": "image" }])),
                layered(json!([{ "type": "button", "action": { "type": "next" } }])),
                layered(json!([
                    { "type": "button", "label": "Go", "action": { "type": "next" } },
                    { "type": "video", "src": "clip.mp4" }
                ])),
                layered(json!("not a list"))
            ]
        });

        // Act
        let document = Document::from_value(&raw);

        // Assert
        let [cards, unlabeled, button, scalar] = &document.contents[..] else {
            panic!("expected four bubbles, got {}", document.len());
        };
        assert!(cards.has_cards());
        assert_eq!(cards.layers().len(), 1);
        assert!(matches!(cards.hero, Some(Hero::Layered(_))));
        assert!(unlabeled.layers().is_empty());
        assert!(!unlabeled.has_buttons());
        assert!(button.has_buttons());
        assert_eq!(button.layers().len(), 1);
        assert!(matches!(scalar.hero, Some(Hero::Layered(_))));
        assert!(scalar.layers().is_empty());
    }

    #[test]
    fn test_non_object_bubble_keeps_index() {
        let raw = json!({ "contents": [42, fixtures::plain_bubble("second")] });

        let document = Document::from_value(&raw);

        assert_eq!(document.len(), 2);
        assert_eq!(document.contents[0], Bubble::default());
        assert!(document.contents[1].body.is_some());
    }

    #[test]
    fn test_zero_cooldown_is_no_cooldown() {
        let bubble = Bubble {
            cooldown_ms: Some(0),
            ..Bubble::default()
        };

        assert_eq!(bubble.cooldown(), None);
    }

    #[test]
    fn test_button_layer_lookup_by_layer_index() {
        let raw = fixtures::document(vec![fixtures::button_bubble(
            json!({ "type": "goto", "index": 0 }),
        )]);
        let document = Document::from_value(&raw);
        let bubble = &document.contents[0];

        let button_index = bubble
            .layers()
            .iter()
            .position(|layer| matches!(layer, Layer::Button(_)))
            .unwrap();

        assert_eq!(
            bubble.button_layer(button_index).unwrap().action,
            Action::Goto { index: 0 }
        );
        assert!(bubble.button_layer(button_index + 10).is_none());
    }
}
