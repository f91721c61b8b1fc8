//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use carousel_core::clock::Clock;
use carousel_core::config::CarouselConfig;
use carousel_core::error::CarouselError;
use carousel_core::host::CarouselHost;
use carousel_session::application::carousel::Carousel;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// A hosted carousel and the wall-clock instant its virtual time last caught
/// up to.
#[derive(Debug)]
pub struct HostedCarousel {
    /// The running carousel.
    pub carousel: Carousel,
    last_seen: DateTime<Utc>,
}

impl HostedCarousel {
    /// Wraps a carousel started at `now`.
    #[must_use]
    pub fn new(carousel: Carousel, now: DateTime<Utc>) -> Self {
        Self {
            carousel,
            last_seen: now,
        }
    }

    /// Advances virtual time by the wall-clock time elapsed since the last
    /// request. A clock that went backwards advances nothing.
    pub fn catch_up(&mut self, now: DateTime<Utc>, host: &mut dyn CarouselHost) {
        let elapsed = u64::try_from((now - self.last_seen).num_milliseconds()).unwrap_or(0);
        if elapsed > 0 {
            self.carousel.advance_time(elapsed, host);
        }
        self.last_seen = self.last_seen.max(now);
    }

    /// Wall-clock instant of the last request that touched the session.
    #[must_use]
    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Wall clock driving session time.
    pub clock: Arc<dyn Clock>,
    /// Tuning applied to every new carousel.
    pub config: CarouselConfig,
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<HostedCarousel>>>>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: CarouselConfig) -> Self {
        Self {
            clock,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a started carousel under its session id.
    pub async fn insert(&self, carousel: Carousel) -> Uuid {
        let session_id = carousel.session_id();
        let hosted = HostedCarousel::new(carousel, self.clock.now());
        self.sessions
            .write()
            .await
            .insert(session_id, Arc::new(Mutex::new(hosted)));
        session_id
    }

    /// Looks up a session.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::SessionNotFound` if no session has the id.
    pub async fn session(&self, session_id: Uuid) -> Result<Arc<Mutex<HostedCarousel>>, CarouselError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(CarouselError::SessionNotFound(session_id))
    }

    /// Drops a session.
    ///
    /// # Errors
    ///
    /// Returns `CarouselError::SessionNotFound` if no session has the id.
    pub async fn remove(&self, session_id: Uuid) -> Result<(), CarouselError> {
        self.sessions
            .write()
            .await
            .remove(&session_id)
            .map(|_| ())
            .ok_or(CarouselError::SessionNotFound(session_id))
    }

    /// Drops every session not seen for `idle_for` as of `now`. Sessions
    /// busy with a request are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, now: DateTime<Utc>, idle_for: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, hosted| match hosted.try_lock() {
            Ok(hosted) => now - hosted.last_seen < idle_for,
            Err(_) => true,
        });
        before - sessions.len()
    }

    /// Number of hosted sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
