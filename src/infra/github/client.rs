use anyhow::{Context, Result};
use async_trait::async_trait;
use quiz_curve::fetch::{BasicClient, HttpClient, fetch_bytes};

use crate::services::mark_source::{MarkSource, SourceRef};

/// Public repository the weekly quiz results are published to.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/bcelen/FTMBA_quizzes/main";

/// Reads week files as `{base_url}/week{N}.csv`, plus arbitrary URLs and
/// local files.
pub struct GithubMarkSource<C = BasicClient> {
    base_url: String,
    client: C,
}

impl GithubMarkSource {
    /// Uses `QUIZ_MARKS_BASE_URL` when set, the public repository otherwise.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("QUIZ_MARKS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::with_client(base_url, BasicClient::new()?))
    }
}

impl<C: HttpClient> GithubMarkSource<C> {
    pub fn with_client(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn week_url(&self, week: u32) -> String {
        format!("{}/week{}.csv", self.base_url, week)
    }
}

#[async_trait]
impl<C: HttpClient> MarkSource for GithubMarkSource<C> {
    #[tracing::instrument(skip(self, source), fields(source = ?source))]
    async fn fetch_column(&self, source: &SourceRef) -> Result<Vec<u8>> {
        match source {
            SourceRef::Week(week) => fetch_bytes(&self.client, &self.week_url(*week)).await,
            SourceRef::Url(url) => fetch_bytes(&self.client, url).await,
            SourceRef::File(path) => {
                std::fs::read(path).with_context(|| format!("failed to read '{path}'"))
            }
        }
    }
}
