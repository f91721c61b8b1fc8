//! Local playback state of an audio layer.
//!
//! Playback is independent of navigation: nothing here reads or writes
//! carousel state, and the carousel never consults it.

use carousel_document::domain::layer::AudioLayer;
use serde::Serialize;

/// Play/pause and position of one audio layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioPlayback {
    /// Currently playing.
    pub playing: bool,
    /// Playhead in milliseconds.
    pub position_ms: u64,
    /// Track length, when known.
    pub duration_ms: Option<u64>,
    /// Wrap to the start at the end.
    pub looping: bool,
}

impl AudioPlayback {
    /// Initial state for a layer; playing if it autoplays.
    #[must_use]
    pub fn for_layer(layer: &AudioLayer) -> Self {
        Self {
            playing: layer.autoplay,
            position_ms: 0,
            duration_ms: layer.duration_ms.filter(|ms| *ms > 0),
            looping: layer.looping,
        }
    }

    /// Starts playback. At the end of a non-looping track, restarts it.
    pub fn play(&mut self) {
        if self.duration_ms.is_some_and(|duration| self.position_ms >= duration) {
            self.position_ms = 0;
        }
        self.playing = true;
    }

    /// Pauses playback, keeping the position.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flips between playing and paused.
    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Moves the playhead, clamped to the duration.
    pub fn seek(&mut self, position_ms: u64) {
        self.position_ms = match self.duration_ms {
            Some(duration) => position_ms.min(duration),
            None => position_ms,
        };
    }

    /// Advances the playhead by `elapsed_ms` if playing.
    pub fn tick(&mut self, elapsed_ms: u64) {
        if !self.playing {
            return;
        }
        let advanced = self.position_ms.saturating_add(elapsed_ms);
        match self.duration_ms {
            Some(duration) if advanced >= duration => {
                if self.looping {
                    self.position_ms = advanced % duration;
                } else {
                    self.position_ms = duration;
                    self.playing = false;
                }
            }
            _ => self.position_ms = advanced,
        }
    }
}
