//! Host callbacks collected while handling a request.

use carousel_core::host::CarouselHost;
use serde::Serialize;

/// One callback the carousel raised towards its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A postback button was pressed.
    Postback {
        /// Payload, forwarded verbatim.
        data: String,
    },
    /// An internal path for the host router.
    Route {
        /// Internal path.
        path: String,
    },
    /// An external location to open.
    External {
        /// Target location.
        uri: String,
        /// Open in a new surface.
        new_tab: bool,
    },
    /// Every required card of a bubble is revealed.
    AllDrawn {
        /// Bubble hosting the draw.
        bubble: usize,
    },
    /// The session completed.
    Complete,
}

/// A `CarouselHost` that queues callbacks for the HTTP response.
#[derive(Debug, Default)]
pub struct NotificationHost {
    notifications: Vec<Notification>,
}

impl NotificationHost {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the host, returning the queued callbacks in order.
    #[must_use]
    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}

impl CarouselHost for NotificationHost {
    fn postback(&mut self, data: &str) {
        self.notifications.push(Notification::Postback {
            data: data.to_owned(),
        });
    }

    fn route(&mut self, path: &str) {
        self.notifications.push(Notification::Route {
            path: path.to_owned(),
        });
    }

    fn open_external(&mut self, uri: &str, new_surface: bool) {
        self.notifications.push(Notification::External {
            uri: uri.to_owned(),
            new_tab: new_surface,
        });
    }

    fn all_drawn(&mut self, bubble: usize) {
        self.notifications.push(Notification::AllDrawn { bubble });
    }

    fn complete(&mut self) {
        self.notifications.push(Notification::Complete);
    }
}
