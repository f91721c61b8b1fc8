//! Loading pipeline: raw text → substituted JSON → typed document.

pub mod loader;
