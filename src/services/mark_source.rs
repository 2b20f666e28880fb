//! Trait and types for obtaining raw quiz mark columns.

use anyhow::Result;

/// Where a mark column comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    /// A numbered week in the configured mark repository.
    Week(u32),
    /// An explicit `http(s)` URL.
    Url(String),
    /// A local CSV file.
    File(String),
}

impl SourceRef {
    /// Interprets a command-line argument: anything starting with `http` is
    /// a URL, everything else a local path.
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("http") {
            SourceRef::Url(arg.to_string())
        } else {
            SourceRef::File(arg.to_string())
        }
    }

    /// Cache key; two references to the same column share one.
    pub fn key(&self) -> String {
        match self {
            SourceRef::Week(week) => format!("week{week}"),
            SourceRef::Url(url) => url.clone(),
            SourceRef::File(path) => path.clone(),
        }
    }
}

/// Abstraction over a provider of raw mark CSV files.
#[async_trait::async_trait]
pub trait MarkSource: Send + Sync {
    /// Returns the raw bytes of the CSV file for `source`.
    async fn fetch_column(&self, source: &SourceRef) -> Result<Vec<u8>>;
}
