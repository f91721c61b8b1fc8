//! Test host that records every callback the carousel raises.

use carousel_core::host::CarouselHost;

/// One recorded host callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `postback(data)`.
    Postback(String),
    /// `route(path)`.
    Route(String),
    /// `open_external(uri, new_surface)`.
    External(String, bool),
    /// `all_drawn(bubble)`.
    AllDrawn(usize),
    /// `complete()`.
    Complete,
}

/// A host that records calls in order.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
}

impl RecordingHost {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Number of `complete()` calls.
    #[must_use]
    pub fn completions(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| **call == HostCall::Complete)
            .count()
    }
}

impl CarouselHost for RecordingHost {
    fn postback(&mut self, data: &str) {
        self.calls.push(HostCall::Postback(data.to_owned()));
    }

    fn route(&mut self, path: &str) {
        self.calls.push(HostCall::Route(path.to_owned()));
    }

    fn open_external(&mut self, uri: &str, new_surface: bool) {
        self.calls.push(HostCall::External(uri.to_owned(), new_surface));
    }

    fn all_drawn(&mut self, bubble: usize) {
        self.calls.push(HostCall::AllDrawn(bubble));
    }

    fn complete(&mut self) {
        self.calls.push(HostCall::Complete);
    }
}
