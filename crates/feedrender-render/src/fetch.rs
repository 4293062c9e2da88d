//! Outbound feed retrieval.
//!
//! The pipeline depends on the [`FeedSource`] trait rather than on `reqwest`
//! directly so tests can substitute slow or failing sources.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Url};

use crate::error::RenderError;
use crate::model::{parse_feed, ParsedFeed};

const FEED_ACCEPT: &str =
    "application/rss+xml, application/atom+xml, application/xml;q=0.9, text/xml;q=0.9, */*;q=0.8";

/// Something that can turn a validated URL into a parsed feed.
pub trait FeedSource: Send + Sync {
    /// Fetch and decode the feed at `url`. Called at most once per request.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<ParsedFeed, RenderError>> + Send;
}

/// [`FeedSource`] backed by a shared `reqwest` client.
///
/// The client carries no time limit of its own; the pipeline bounds the
/// whole fetch-and-decode step.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    /// Build the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the TLS backend cannot be initialised.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(FEED_ACCEPT));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &Url) -> Result<ParsedFeed, RenderError> {
        tracing::debug!(url = %url, "fetching feed");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RenderError::Fetch(describe(&e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| RenderError::Fetch(describe(&e)))?;

        parse_feed(&body)
    }
}

/// Flatten a `reqwest` error and its sources into one line.
fn describe(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
