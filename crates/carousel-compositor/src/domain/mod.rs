//! Pure layout and paint rules.

pub mod audio;
pub mod button;
pub mod placement;
pub mod text;
