//! Read-only view of a fetched feed.

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Feed, Link};

use crate::error::RenderError;

/// A decoded RSS or Atom feed, reduced to what the page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFeed {
    pub title: String,
    pub link: String,
    pub items: Vec<Item>,
}

/// One feed entry. `content` and `description` hold untrusted HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub content: Option<String>,
    pub description: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

impl Item {
    /// The HTML field to render: `content` when non-empty, else `description`.
    #[must_use]
    pub fn body_html(&self) -> &str {
        self.content
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.description.as_deref())
            .unwrap_or_default()
    }
}

impl From<Feed> for ParsedFeed {
    fn from(feed: Feed) -> Self {
        Self {
            title: feed.title.map(|t| t.content).unwrap_or_default(),
            link: primary_link(feed.links),
            items: feed.entries.into_iter().map(Item::from).collect(),
        }
    }
}

impl From<Entry> for Item {
    fn from(entry: Entry) -> Self {
        Self {
            title: entry.title.map(|t| t.content).unwrap_or_default(),
            link: primary_link(entry.links),
            content: entry.content.and_then(|c| c.body),
            description: entry.summary.map(|s| s.content),
            published: entry.published.or(entry.updated),
        }
    }
}

/// The human-facing link: the first one without a `rel` or with
/// `rel="alternate"`, else whatever comes first.
///
/// RSS channels often list `<atom:link rel="self">` ahead of `<link>`.
fn primary_link(links: Vec<Link>) -> String {
    let index = links
        .iter()
        .position(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .unwrap_or(0);
    links
        .into_iter()
        .nth(index)
        .map(|l| l.href)
        .unwrap_or_default()
}

/// Decode an RSS or Atom document.
///
/// # Errors
///
/// Returns [`RenderError::Fetch`] with the parser's message if the document is
/// not a recognizable feed.
pub fn parse_feed(body: &[u8]) -> Result<ParsedFeed, RenderError> {
    feed_rs::parser::parse(body)
        .map(ParsedFeed::from)
        .map_err(|e| RenderError::Fetch(format!("failed to parse feed: {e}")))
}
