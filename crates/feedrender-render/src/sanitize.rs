//! Allowlist sanitization of untrusted feed HTML.

use std::fmt;

/// HTML that has passed through [`Sanitizer::sanitize`].
///
/// The field is private: the only way to obtain a value is sanitization, so
/// templates can emit it unescaped while every plain `String` stays escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stateless user-generated-content policy, shared across requests.
pub struct Sanitizer {
    policy: ammonia::Builder<'static>,
}

impl Sanitizer {
    #[must_use]
    pub fn new() -> Self {
        let mut policy = ammonia::Builder::default();
        policy.link_rel(Some("nofollow noopener noreferrer"));
        Self { policy }
    }

    /// Strip scripts, event handlers, embeds and unknown tags, keeping
    /// formatting, links, images and lists.
    #[must_use]
    pub fn sanitize(&self, html: &str) -> SafeHtml {
        SafeHtml(self.policy.clean(html).to_string())
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
