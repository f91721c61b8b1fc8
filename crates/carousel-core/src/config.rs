//! Carousel tuning constants.
//!
//! Each carousel instance receives its own configuration, so several
//! carousels with different timings can coexist in one process.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CarouselError;

/// Default number of face-down slots offered while drawing.
pub const DEFAULT_DECK_SIZE: usize = 25;
/// Default delay between selecting a slot and its reveal.
pub const DEFAULT_FLIP_DELAY_MS: u64 = 800;
/// Default delay between the last reveal and the interpretation phase.
pub const DEFAULT_DRAW_SETTLE_DELAY_MS: u64 = 500;
/// Default delay before auto-advancing past a completed card bubble.
pub const DEFAULT_AUTO_ADVANCE_DELAY_MS: u64 = 1500;
/// Default delay before advancing into a button-locked bubble.
pub const DEFAULT_BUTTON_LOCK_ADVANCE_DELAY_MS: u64 = 500;
/// Default minimum horizontal delta that counts as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;
/// Default recursion ceiling for template substitution.
pub const DEFAULT_MAX_TEMPLATE_DEPTH: usize = 64;

/// Injected tuning for one carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselConfig {
    /// Number of draw slots presented in the drawing phase.
    pub deck_size: usize,
    /// Flip animation gate before a selected slot is revealed.
    pub flip_delay_ms: u64,
    /// Settle time between the final reveal and the showing phase.
    pub draw_settle_delay_ms: u64,
    /// Auto-advance delay after a card bubble completes.
    pub auto_advance_delay_ms: u64,
    /// Advance delay when the next bubble is button-locked.
    pub button_lock_advance_delay_ms: u64,
    /// Horizontal delta separating a swipe from a tap.
    pub swipe_threshold: f32,
    /// Maximum nesting depth walked by template substitution.
    pub max_template_depth: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            deck_size: DEFAULT_DECK_SIZE,
            flip_delay_ms: DEFAULT_FLIP_DELAY_MS,
            draw_settle_delay_ms: DEFAULT_DRAW_SETTLE_DELAY_MS,
            auto_advance_delay_ms: DEFAULT_AUTO_ADVANCE_DELAY_MS,
            button_lock_advance_delay_ms: DEFAULT_BUTTON_LOCK_ADVANCE_DELAY_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            max_template_depth: DEFAULT_MAX_TEMPLATE_DEPTH,
        }
    }
}

impl CarouselConfig {
    /// Reads configuration from `CAROUSEL_*` environment variables, falling
    /// back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Configuration` if a variable does not parse or
    /// the resulting configuration is out of range.
    pub fn from_env() -> Result<Self, CarouselError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CarouselConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Configuration` on unparsable or invalid values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CarouselError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            deck_size: parse_var(&lookup, "CAROUSEL_DECK_SIZE", defaults.deck_size)?,
            flip_delay_ms: parse_var(&lookup, "CAROUSEL_FLIP_DELAY_MS", defaults.flip_delay_ms)?,
            draw_settle_delay_ms: parse_var(
                &lookup,
                "CAROUSEL_DRAW_SETTLE_DELAY_MS",
                defaults.draw_settle_delay_ms,
            )?,
            auto_advance_delay_ms: parse_var(
                &lookup,
                "CAROUSEL_AUTO_ADVANCE_DELAY_MS",
                defaults.auto_advance_delay_ms,
            )?,
            button_lock_advance_delay_ms: parse_var(
                &lookup,
                "CAROUSEL_BUTTON_LOCK_ADVANCE_DELAY_MS",
                defaults.button_lock_advance_delay_ms,
            )?,
            swipe_threshold: parse_var(
                &lookup,
                "CAROUSEL_SWIPE_THRESHOLD",
                defaults.swipe_threshold,
            )?,
            max_template_depth: parse_var(
                &lookup,
                "CAROUSEL_MAX_TEMPLATE_DEPTH",
                defaults.max_template_depth,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::Configuration` naming the offending field.
    pub fn validate(&self) -> Result<(), CarouselError> {
        if self.deck_size == 0 {
            return Err(CarouselError::Configuration(
                "deck_size must be at least 1".to_owned(),
            ));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold <= 0.0 {
            return Err(CarouselError::Configuration(
                "swipe_threshold must be a positive number".to_owned(),
            ));
        }
        if self.max_template_depth == 0 {
            return Err(CarouselError::Configuration(
                "max_template_depth must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T, CarouselError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CarouselError::Configuration(format!("{key} must be valid: {e}"))),
    }
}
