//! Page composition from the header, body and footer templates.
//!
//! Every interpolated `String` is HTML-escaped by askama. The only value
//! written with the `safe` filter is [`SafeHtml`], which can only come out of
//! the [`Sanitizer`].

use askama::Template;

use crate::error::ComposeError;
use crate::model::{Item, ParsedFeed};
use crate::pipeline::RenderOutcome;
use crate::sanitize::{SafeHtml, Sanitizer};

pub const LANDING_TITLE: &str = "RSS/Atom feed renderer";
pub const ERROR_TITLE: &str = "Error rendering feed";

const FOOTER: &str = "\n</body>\n</html>\n";
const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const BLOCKED_HREF: &str = "#blocked";

#[derive(Template)]
#[template(path = "header.html")]
struct HeaderTemplate<'a> {
    title: &'a str,
    url: &'a str,
}

#[derive(Template)]
#[template(path = "feed.html")]
struct FeedTemplate<'a> {
    title: &'a str,
    link: &'a str,
    entries: Vec<EntryView<'a>>,
}

struct EntryView<'a> {
    title: &'a str,
    link: &'a str,
    content: SafeHtml,
    published: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    message: &'a str,
    href: &'a str,
    url: &'a str,
}

/// Renders page regions. Holds the shared sanitization policy.
#[derive(Default)]
pub struct Composer {
    sanitizer: Sanitizer,
}

impl Composer {
    #[must_use]
    pub fn new(sanitizer: Sanitizer) -> Self {
        Self { sanitizer }
    }

    /// Build the full page for one request outcome.
    ///
    /// `raw_url` is the value exactly as the client sent it; it is echoed
    /// back into the form and, on failure, into the error panel.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] if a template fails to execute.
    pub fn compose(&self, raw_url: &str, outcome: &RenderOutcome) -> Result<Vec<u8>, ComposeError> {
        let (title, body) = match outcome {
            RenderOutcome::Landing => (LANDING_TITLE, None),
            RenderOutcome::Feed(feed) => (feed.title.as_str(), Some(self.feed_body(feed)?)),
            RenderOutcome::Failed(error) => {
                (ERROR_TITLE, Some(error_body(&error.to_string(), raw_url)?))
            }
        };

        let header = HeaderTemplate { title, url: raw_url }.render()?;

        let mut page = String::with_capacity(
            header.len() + body.as_ref().map_or(0, String::len) + FOOTER.len(),
        );
        page.push_str(&header);
        if let Some(body) = body {
            page.push_str(&body);
        }
        page.push_str(FOOTER);
        Ok(page.into_bytes())
    }

    /// Render the feed region: the title anchor followed by one block per item.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] if the template fails to execute.
    pub fn feed_body(&self, feed: &ParsedFeed) -> Result<String, ComposeError> {
        let entries = feed.items.iter().map(|item| self.entry_view(item)).collect();
        let template = FeedTemplate {
            title: &feed.title,
            link: link_href(&feed.link),
            entries,
        };
        Ok(template.render()?)
    }

    fn entry_view<'a>(&self, item: &'a Item) -> EntryView<'a> {
        EntryView {
            title: &item.title,
            link: link_href(&item.link),
            content: self.sanitizer.sanitize(item.body_html()),
            published: item
                .published
                .map(|p| p.format(PUBLISHED_FORMAT).to_string()),
        }
    }
}

/// Render the error panel for `message`, linking back to `url`.
///
/// # Errors
///
/// Returns [`ComposeError`] if the template fails to execute.
pub fn error_body(message: &str, url: &str) -> Result<String, ComposeError> {
    let template = ErrorTemplate {
        message,
        href: link_href(url),
        url,
    };
    Ok(template.render()?)
}

/// Value for an `href` attribute built from untrusted input.
///
/// Escaping alone does not stop `javascript:` links, so any URL with a scheme
/// other than `http`, `https` or `mailto` is replaced. Scheme-less (relative)
/// references pass through.
fn link_href(raw: &str) -> &str {
    let trimmed = raw.trim_start();
    let scheme = trimmed
        .find(|c: char| matches!(c, ':' | '/' | '?' | '#'))
        .filter(|&end| trimmed[end..].starts_with(':'))
        .map(|end| &trimmed[..end]);

    match scheme {
        None => raw,
        Some(s)
            if ["http", "https", "mailto"]
                .iter()
                .any(|allowed| s.eq_ignore_ascii_case(allowed)) =>
        {
            raw
        }
        Some(_) => BLOCKED_HREF,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::error::RenderError;

    fn item(title: &str, content: Option<&str>, description: Option<&str>) -> Item {
        Item {
            title: title.to_string(),
            link: "https://example.com/item".to_string(),
            content: content.map(ToOwned::to_owned),
            description: description.map(ToOwned::to_owned),
            published: None,
        }
    }

    fn feed(items: Vec<Item>) -> ParsedFeed {
        ParsedFeed {
            title: "Example Feed".to_string(),
            link: "https://example.com/".to_string(),
            items,
        }
    }

    fn page(outcome: &RenderOutcome, url: &str) -> String {
        let bytes = Composer::default().compose(url, outcome).expect("compose");
        String::from_utf8(bytes).expect("utf-8")
    }

    #[test]
    fn feed_body_places_titles_in_anchor_and_heading() {
        let body = Composer::default()
            .feed_body(&feed(vec![item("Hello", Some("<p>hi</p>"), None)]))
            .expect("render");

        assert_eq!(body.matches("Example Feed").count(), 1, "{body}");
        assert_eq!(body.matches("Hello").count(), 1, "{body}");
        assert!(body.contains(r#"rel="nofollow">Example Feed</a></h2>"#), "{body}");
        assert!(body.contains(r#"rel="nofollow">Hello</a></h3>"#), "{body}");
        assert!(body.contains("<p>hi</p>"), "{body}");
    }

    #[test]
    fn content_wins_over_description() {
        let body = Composer::default()
            .feed_body(&feed(vec![item(
                "Both",
                Some("<p>from-content</p>"),
                Some("<p>from-description</p>"),
            )]))
            .expect("render");
        assert!(body.contains("from-content"), "{body}");
        assert!(!body.contains("from-description"), "{body}");
    }

    #[test]
    fn description_used_when_content_missing() {
        let body = Composer::default()
            .feed_body(&feed(vec![item("Desc", None, Some("<em>from-description</em>"))]))
            .expect("render");
        assert!(body.contains("<em>from-description</em>"), "{body}");
    }

    #[test]
    fn script_in_content_is_not_executable() {
        let body = Composer::default()
            .feed_body(&feed(vec![item(
                "Evil",
                Some("<p>safe <i>text</i><script>alert(1)</script></p>"),
                None,
            )]))
            .expect("render");
        assert!(!body.contains("<script"), "{body}");
        assert!(!body.contains("alert(1)"), "{body}");
        assert!(body.contains("<p>safe <i>text</i></p>"), "{body}");
    }

    #[test]
    fn titles_are_escaped_not_interpreted() {
        let body = Composer::default()
            .feed_body(&ParsedFeed {
                title: "<script>alert(1)</script>".to_string(),
                link: String::new(),
                items: vec![item("<b>bold</b>", None, None)],
            })
            .expect("render");
        assert!(!body.contains("<script>"), "{body}");
        assert!(body.contains("&lt;script&gt;"), "{body}");
        assert!(!body.contains("<b>bold</b>"), "{body}");
    }

    #[test]
    fn link_href_blocks_script_schemes() {
        assert_eq!(link_href("https://example.com/a"), "https://example.com/a");
        assert_eq!(link_href("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(link_href("mailto:me@example.com"), "mailto:me@example.com");
        assert_eq!(link_href("/relative/path"), "/relative/path");
        assert_eq!(link_href("page?x=a:b"), "page?x=a:b");
        assert_eq!(link_href("javascript:alert(1)"), BLOCKED_HREF);
        assert_eq!(link_href(" JavaScript:alert(1)"), BLOCKED_HREF);
        assert_eq!(link_href("data:text/html,x"), BLOCKED_HREF);
    }

    #[test]
    fn item_links_with_script_scheme_are_neutralised() {
        let mut evil = item("Evil", Some("x"), None);
        evil.link = "javascript:alert(document.cookie)".to_string();
        let body = Composer::default().feed_body(&feed(vec![evil])).expect("render");
        assert!(!body.contains("javascript:"), "{body}");
        assert!(body.contains(r##"href="#blocked""##), "{body}");
    }

    #[test]
    fn published_line_only_when_dated() {
        let mut dated = item("Dated", Some("x"), None);
        dated.published = Some(Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap());
        let undated = item("Undated", Some("y"), None);

        let body = Composer::default()
            .feed_body(&feed(vec![dated, undated]))
            .expect("render");
        assert_eq!(body.matches("Published:").count(), 1, "{body}");
        assert!(body.contains("Published: 2024-03-05 07:08:09 +0000"), "{body}");
    }

    #[test]
    fn landing_page_has_header_and_footer_only() {
        let html = page(&RenderOutcome::Landing, "");
        assert!(html.contains("<title>RSS/Atom feed renderer</title>"), "{html}");
        assert!(html.contains(r#"value="""#), "{html}");
        assert!(!html.contains("class=\"alert\""), "{html}");
        assert!(!html.contains("class=\"entry\""), "{html}");
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn failure_page_echoes_url_in_form_and_panel() {
        let html = page(
            &RenderOutcome::Failed(RenderError::Fetch("connection refused".to_string())),
            "http://feeds.invalid/rss?a=1&b=<2>",
        );
        assert!(html.contains("<title>Error rendering feed</title>"), "{html}");
        assert!(html.contains("connection refused"), "{html}");
        assert!(html.contains("class=\"alert\""), "{html}");
        assert!(!html.contains("<2>"), "{html}");
        assert_eq!(html.matches("feeds.invalid").count(), 3, "{html}");
    }

    #[test]
    fn success_page_uses_feed_title() {
        let html = page(
            &RenderOutcome::Feed(feed(vec![item("Hello", Some("hi"), None)])),
            "https://example.com/feed.xml",
        );
        assert!(html.contains("<title>Example Feed</title>"), "{html}");
        assert!(html.contains("class=\"entry\""), "{html}");
        assert_eq!(html.matches("</html>").count(), 1);
    }

    #[test]
    fn composing_is_deterministic() {
        let outcome = RenderOutcome::Feed(feed(vec![item("Hello", Some("<p>hi</p>"), None)]));
        let composer = Composer::default();
        let first = composer.compose("https://example.com/feed.xml", &outcome).unwrap();
        let second = composer.compose("https://example.com/feed.xml", &outcome).unwrap();
        assert_eq!(first, second);
    }
}
