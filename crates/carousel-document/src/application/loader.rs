//! Turns raw document text or JSON into substituted, typed documents.

use carousel_core::error::CarouselError;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::card::CardSet;
use crate::domain::model::Document;
use crate::domain::template::{Variables, substitute};

/// A document and its card set after substitution and normalization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedCarousel {
    /// Normalized document.
    pub document: Document,
    /// Cards for every cards bubble, if supplied.
    pub cards: Option<CardSet>,
}

/// Parses JSON text into a raw tree.
///
/// # Errors
///
/// Returns `CarouselError::Serialization` if the text is not JSON.
pub fn parse_json(text: &str) -> Result<Value, CarouselError> {
    Ok(serde_json::from_str(text)?)
}

/// Parses YAML text into a raw tree.
///
/// # Errors
///
/// Returns `CarouselError::Serialization` if the text is not YAML or holds
/// values JSON cannot represent.
pub fn parse_yaml(text: &str) -> Result<Value, CarouselError> {
    serde_yaml::from_str(text)
        .map_err(|e| CarouselError::Serialization(format!("invalid YAML document: {e}")))
}

/// Substitutes variables into the raw document and card set, then
/// normalizes both. Never fails; malformed pieces degrade as documented on
/// [`Document::from_value`] and [`CardSet::from_value`].
#[must_use]
pub fn load(
    raw_document: &Value,
    raw_cards: Option<&Value>,
    variables: &Variables,
    max_depth: usize,
) -> LoadedCarousel {
    let document = Document::from_value(&substitute(raw_document, variables, max_depth));
    let cards = raw_cards
        .filter(|raw| !raw.is_null())
        .map(|raw| CardSet::from_value(&substitute(raw, variables, max_depth)));

    debug!(
        bubbles = document.len(),
        cards = cards.as_ref().map_or(0, |set| set.content.len()),
        variables = variables.len(),
        "loaded carousel document"
    );

    LoadedCarousel { document, cards }
}

/// Substitutes variables into an already typed document.
#[must_use]
pub fn substitute_document(document: &Document, variables: &Variables, max_depth: usize) -> Document {
    match serde_json::to_value(document) {
        Ok(raw) => Document::from_value(&substitute(&raw, variables, max_depth)),
        Err(e) => {
            warn!(error = %e, "document could not be re-serialized; substitution skipped");
            document.clone()
        }
    }
}
