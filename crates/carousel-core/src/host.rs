//! Host collaborator abstraction.
//!
//! Everything the carousel cannot do itself (routing to other screens,
//! opening external links, reporting postbacks and completion) is forwarded
//! to the embedding application through this trait.

/// Callbacks the carousel raises towards its host application.
pub trait CarouselHost {
    /// A `postback` button was pressed; `data` is forwarded verbatim.
    fn postback(&mut self, data: &str);

    /// A `uri` button targeted an internal path handled by the host router.
    fn route(&mut self, path: &str);

    /// A `uri` button targeted an external location or a new surface.
    fn open_external(&mut self, uri: &str, new_surface: bool);

    /// Every required card of the bubble at `bubble` has been revealed.
    fn all_drawn(&mut self, bubble: usize);

    /// The final card flow has settled and nothing more will auto-advance.
    fn complete(&mut self);
}

/// A host that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl CarouselHost for NoopHost {
    fn postback(&mut self, _data: &str) {}

    fn route(&mut self, _path: &str) {}

    fn open_external(&mut self, _uri: &str, _new_surface: bool) {}

    fn all_drawn(&mut self, _bubble: usize) {}

    fn complete(&mut self) {}
}
