//! Up-front validation of the user supplied feed URL.

use reqwest::Url;

use crate::error::RenderError;

pub const INVALID_URL: &str = "invalid url";
pub const INVALID_SCHEME: &str = "invalid url protocol, only http and https are allowed";

/// Validate the raw `url` query value without touching the network.
///
/// Returns `Ok(None)` for the empty string, which means no feed was requested.
///
/// # Errors
///
/// Returns [`RenderError::InvalidUrl`] if the value is not an absolute URL or
/// its scheme is anything other than `http` or `https`.
pub fn validate(raw: &str) -> Result<Option<Url>, RenderError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(raw).map_err(|_| RenderError::InvalidUrl(INVALID_URL))?;
    match url.scheme() {
        "http" | "https" => Ok(Some(url)),
        _ => Err(RenderError::InvalidUrl(INVALID_SCHEME)),
    }
}
