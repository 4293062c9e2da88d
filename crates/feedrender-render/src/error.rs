use std::time::Duration;

use thiserror::Error;

/// Failures that are shown to the user in the error panel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The URL did not parse, or its scheme is not `http`/`https`.
    #[error("{0}")]
    InvalidUrl(&'static str),

    /// Fetching and decoding the feed did not finish within the budget.
    #[error("timed out after {0:?} while fetching the feed")]
    FetchTimeout(Duration),

    /// Network, HTTP status or feed decoding failure.
    #[error("{0}")]
    Fetch(String),
}

/// A template failed to execute. This is a defect, not a user input problem.
#[derive(Debug, Error)]
#[error("failed to compose page: {0}")]
pub struct ComposeError(#[from] askama::Error);
