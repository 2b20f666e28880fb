//! Service traits and the cached loader built on them.

pub mod loader;
pub mod mark_source;
