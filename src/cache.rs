//! Explicit cache of parsed mark columns, keyed by source identifier.

use std::collections::HashMap;

use tracing::debug;

use crate::curve::ScoreSet;

/// Parsed columns keyed by source (a week id, a path, a URL).
///
/// Entries live until the owner invalidates them; nothing is global.
#[derive(Debug, Default)]
pub struct ScoreCache {
    entries: HashMap<String, ScoreSet>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ScoreSet> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, scores: ScoreSet) {
        let key = key.into();
        debug!(key = %key, n = scores.len(), "Caching mark column");
        self.entries.insert(key, scores);
    }

    /// Drops the entry for `key`, returning whether one existed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
