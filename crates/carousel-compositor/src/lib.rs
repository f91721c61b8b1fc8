//! Tarot carousel — Layer Compositor.
//!
//! Computes where each hero layer lands (anchor translation, rotation,
//! scale), in which order layers paint, and how text and button layers are
//! styled. Audio layers carry their own playback state. Drawing pixels is
//! left to the host's render surface.

pub mod application;
pub mod domain;
