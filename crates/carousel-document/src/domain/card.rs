//! Tarot cards and the card set supplied alongside a document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Separator between interpretation pages.
pub const PAGE_SEPARATOR: char = '|';

/// One drawn card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    /// Card name, e.g. "The Tower".
    pub title: String,
    /// Face image.
    pub image_url: String,
    /// Name of the spread position this card lands in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
    /// Description of the spread position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_desc: Option<String>,
    /// `|`-delimited interpretation pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

impl Card {
    /// Interpretation pages in reading order. Never empty.
    #[must_use]
    pub fn pages(&self) -> Vec<&str> {
        interpretation_pages(self.interpretation.as_deref())
    }

    /// Number of pages this card contributes: `max(1, segment_count)`.
    #[must_use]
    pub fn page_count(&self) -> usize {
        segment_count(self.interpretation.as_deref()).max(1)
    }
}

/// Number of non-empty trimmed `|` segments.
#[must_use]
pub fn segment_count(raw: Option<&str>) -> usize {
    raw.map_or(0, |text| {
        text.split(PAGE_SEPARATOR)
            .filter(|segment| !segment.trim().is_empty())
            .count()
    })
}

/// Splits an interpretation into pages.
///
/// Segments are trimmed and empty ones dropped. With no segment left the
/// whole raw string (or the empty string) is the single page.
#[must_use]
pub fn interpretation_pages(raw: Option<&str>) -> Vec<&str> {
    let pages: Vec<&str> = raw
        .into_iter()
        .flat_map(|text| text.split(PAGE_SEPARATOR))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    if pages.is_empty() {
        vec![raw.unwrap_or_default()]
    } else {
        pages
    }
}

/// Cards for a reading plus presentation hints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSet {
    /// Cards in position order.
    pub content: Vec<Card>,
    /// Card-back image, also the fallback when a face fails to load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Spread template name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl CardSet {
    /// Parses a card set leniently: cards that do not parse are dropped with
    /// a warning instead of rejecting the whole set.
    #[must_use]
    pub fn from_value(raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            warn!("card set is not an object; using an empty set");
            return Self::default();
        };

        let content = object
            .get("content")
            .and_then(Value::as_array)
            .map(|cards| {
                cards
                    .iter()
                    .enumerate()
                    .filter_map(|(index, card)| match Card::deserialize(card) {
                        Ok(card) => Some(card),
                        Err(e) => {
                            warn!(card = index, error = %e, "dropping malformed card");
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            content,
            style: object.get("style").and_then(Value::as_str).map(str::to_owned),
            template: object
                .get("template")
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    /// The cards a draw actually uses: at most one per deck slot.
    #[must_use]
    pub fn drawable(&self, deck_size: usize) -> &[Card] {
        &self.content[..self.content.len().min(deck_size)]
    }
}
