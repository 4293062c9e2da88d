//! Fetch, parse, sanitize and render remote RSS/Atom feeds as HTML.
//!
//! The entry point is [`Pipeline::render`], which turns the raw `url` query
//! value into a complete HTML page. Every user-facing failure is rendered into
//! the page itself; only template defects surface as [`ComposeError`].

pub mod compose;
pub mod error;
pub mod fetch;
pub mod model;
pub mod pipeline;
pub mod sanitize;
pub mod url;

pub use compose::Composer;
pub use error::{ComposeError, RenderError};
pub use fetch::{FeedSource, HttpFeedSource};
pub use model::{Item, ParsedFeed};
pub use pipeline::{Pipeline, RenderOutcome, DEFAULT_FETCH_TIMEOUT};
pub use sanitize::{SafeHtml, Sanitizer};
