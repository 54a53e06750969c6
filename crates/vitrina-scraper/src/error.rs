use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {url}")]
    RateLimited { url: String },

    #[error("page not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid listing URL {url}: {source}")]
    ListingUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("could not start browser session at {webdriver_url}: {reason}")]
    SessionStart {
        webdriver_url: String,
        reason: String,
    },

    #[error("browser command failed ({action}): {reason}")]
    Browser { action: String, reason: String },

    /// A required element or state change did not appear within the bound.
    #[error("timed out after {timeout_ms}ms waiting for {condition}")]
    NavigationTimeout { condition: String, timeout_ms: u64 },

    #[error("enumeration of {listing} exceeded {max_pages} pages without reaching the end")]
    EnumerationStalled { listing: String, max_pages: usize },

    #[error("extraction gap at {url}: missing {field}")]
    ExtractionGap { url: String, field: String },
}

impl ScraperError {
    pub(crate) fn browser(action: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ScraperError::Browser {
            action: action.into(),
            reason: reason.to_string(),
        }
    }
}
