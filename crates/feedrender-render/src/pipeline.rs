//! Per-request orchestration: validate, fetch, compose.

use std::time::Duration;

use crate::compose::Composer;
use crate::error::{ComposeError, RenderError};
use crate::fetch::FeedSource;
use crate::model::ParsedFeed;
use crate::url::validate;

/// Time allowed for fetching and decoding one feed.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Terminal state of one request, before composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No URL supplied.
    Landing,
    Feed(ParsedFeed),
    Failed(RenderError),
}

/// Read-only request pipeline, shared by all concurrent requests.
pub struct Pipeline<S> {
    source: S,
    composer: Composer,
    fetch_timeout: Duration,
}

impl<S: FeedSource> Pipeline<S> {
    #[must_use]
    pub fn new(source: S, composer: Composer) -> Self {
        Self {
            source,
            composer,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Produce the complete page for the raw `url` query value.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] only when a template fails; invalid URLs and
    /// fetch failures are rendered into the page.
    pub async fn render(&self, raw_url: &str) -> Result<Vec<u8>, ComposeError> {
        let outcome = self.resolve(raw_url).await;
        self.composer.compose(raw_url, &outcome)
    }

    /// Run validation and the fetch step, without composing.
    pub async fn resolve(&self, raw_url: &str) -> RenderOutcome {
        let url = match validate(raw_url) {
            Ok(Some(url)) => url,
            Ok(None) => return RenderOutcome::Landing,
            Err(error) => {
                tracing::info!(url = raw_url, error = %error, "rejected feed url");
                return RenderOutcome::Failed(error);
            }
        };

        let fetched = tokio::time::timeout(self.fetch_timeout, self.source.fetch(&url))
            .await
            .unwrap_or(Err(RenderError::FetchTimeout(self.fetch_timeout)));

        match fetched {
            Ok(feed) => {
                tracing::info!(url = %url, items = feed.items.len(), "rendered feed");
                RenderOutcome::Feed(feed)
            }
            Err(error) => {
                tracing::warn!(url = %url, error = %error, "failed to fetch feed");
                RenderOutcome::Failed(error)
            }
        }
    }
}
