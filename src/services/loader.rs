use quiz_curve::cache::ScoreCache;
use quiz_curve::curve::{CurveError, ScoreSet};
use quiz_curve::parser::parse_score_column;
use tracing::{debug, warn};

use crate::services::mark_source::{MarkSource, SourceRef};

/// Fetches and parses mark columns, keeping parsed columns in a [`ScoreCache`]
/// for the lifetime of the loader.
pub struct MarkLoader<S> {
    source: S,
    cache: ScoreCache,
}

impl<S: MarkSource> MarkLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: ScoreCache::new(),
        }
    }

    /// Returns the parsed column for `source_ref`, fetching it on a cache miss.
    ///
    /// # Errors
    ///
    /// Fetch failures become [`CurveError::DataUnavailable`]; parse failures
    /// keep their own variant.
    pub async fn load(&mut self, source_ref: &SourceRef) -> Result<ScoreSet, CurveError> {
        let key = source_ref.key();
        if let Some(scores) = self.cache.get(&key) {
            debug!(key = %key, "Mark column served from cache");
            return Ok(scores.clone());
        }

        let bytes = self.source.fetch_column(source_ref).await.map_err(|e| {
            warn!(key = %key, error = %e, "Mark column fetch failed");
            CurveError::DataUnavailable(format!("{e:#}"))
        })?;
        let scores = parse_score_column(&bytes)?;

        self.cache.insert(key, scores.clone());
        Ok(scores)
    }

    /// Forgets the cached column for `source_ref` so the next [`load`] fetches
    /// it again. Returns whether an entry was dropped.
    ///
    /// [`load`]: Self::load
    pub fn invalidate(&mut self, source_ref: &SourceRef) -> bool {
        let dropped = self.cache.invalidate(&source_ref.key());
        if dropped {
            debug!(key = %source_ref.key(), "Mark column invalidated");
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl MarkSource for CountingSource {
        async fn fetch_column(&self, source: &SourceRef) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match source {
                SourceRef::Week(1) => Ok(b"Mark\n1\n2\n3\n".to_vec()),
                SourceRef::Week(2) => Ok(b"Mark\n1\nx\n".to_vec()),
                _ => Err(anyhow!("404 Not Found")),
            }
        }
    }

    fn loader() -> MarkLoader<CountingSource> {
        MarkLoader::new(CountingSource {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let mut loader = loader();
        let a = loader.load(&SourceRef::Week(1)).await.unwrap();
        let b = loader.load(&SourceRef::Week(1)).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(loader.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let mut loader = loader();
        loader.load(&SourceRef::Week(1)).await.unwrap();
        assert!(loader.invalidate(&SourceRef::Week(1)));
        assert!(!loader.invalidate(&SourceRef::Week(1)));
        loader.load(&SourceRef::Week(1)).await.unwrap();

        assert_eq!(loader.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_week_is_data_unavailable() {
        let mut loader = loader();
        let err = loader.load(&SourceRef::Week(7)).await.unwrap_err();

        assert!(matches!(err, CurveError::DataUnavailable(_)));
        assert!(err.is_data_unavailable());
    }

    #[tokio::test]
    async fn test_bad_mark_is_not_cached() {
        let mut loader = loader();
        let err = loader.load(&SourceRef::Week(2)).await.unwrap_err();
        assert!(matches!(err, CurveError::UnparseableMark { row: 2, .. }));

        let _ = loader.load(&SourceRef::Week(2)).await;
        assert_eq!(loader.source.calls.load(Ordering::SeqCst), 2);
    }
}
