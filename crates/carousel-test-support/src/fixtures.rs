//! JSON fixtures for carousel documents and card sets.
//!
//! Fixtures are raw `serde_json::Value` trees so every crate can use them
//! without depending on the typed document model.

use serde_json::{Value, json};

/// Wraps bubbles into a document.
#[must_use]
pub fn document(bubbles: Vec<Value>) -> Value {
    json!({ "contents": bubbles })
}

/// A bubble with an image hero and a single text body.
#[must_use]
pub fn plain_bubble(text: &str) -> Value {
    json!({
        "hero": { "type": "image", "url": "https://cdn.example/hero.png", "aspectRatio": "1:1" },
        "body": {
            "type": "box",
            "layout": "vertical",
            "contents": [{ "type": "text", "text": text, "wrap": true }]
        }
    })
}

/// A bubble whose body embeds the card draw.
#[must_use]
pub fn cards_body_bubble() -> Value {
    json!({
        "hero": { "type": "image", "url": "https://cdn.example/table.png" },
        "body": { "content": "cards" }
    })
}

/// A bubble whose layered hero contains a cards layer.
#[must_use]
pub fn cards_layer_bubble() -> Value {
    json!({
        "hero": {
            "type": "layered",
            "aspectRatio": "3:4",
            "layers": [
                { "type": "image", "url": "https://cdn.example/cloth.png", "zIndex": 0 },
                { "type": "cards", "position": { "x": 50, "y": 50, "anchor": "center" }, "zIndex": 2 }
            ]
        }
    })
}

/// A bubble with a layered hero holding one button layer.
#[must_use]
pub fn button_bubble(action: Value) -> Value {
    json!({
        "hero": {
            "type": "layered",
            "layers": [
                { "type": "image", "url": "https://cdn.example/door.png" },
                {
                    "type": "button",
                    "label": "Continue",
                    "position": { "x": 50, "y": 90, "anchor": "bottom-center" },
                    "zIndex": 3,
                    "action": action
                }
            ]
        }
    })
}

/// Adds `cooldownMs` to a bubble.
#[must_use]
pub fn with_cooldown(mut bubble: Value, cooldown_ms: u64) -> Value {
    bubble["cooldownMs"] = json!(cooldown_ms);
    bubble
}

/// A card with the given interpretation.
#[must_use]
pub fn card(title: &str, interpretation: &str) -> Value {
    json!({
        "title": title,
        "imageUrl": format!("https://cdn.example/cards/{}.png", title.to_lowercase().replace(' ', "-")),
        "positionTitle": "Present",
        "positionDesc": "What surrounds you now",
        "interpretation": interpretation
    })
}

/// A card set from `(title, interpretation)` pairs.
#[must_use]
pub fn card_set(cards: &[(&str, &str)]) -> Value {
    json!({
        "content": cards.iter().map(|(title, interpretation)| card(title, interpretation)).collect::<Vec<_>>(),
        "style": "https://cdn.example/cards/back.png",
        "template": "three-card"
    })
}
