//! Page retrieval: plain HTTP for server-rendered detail pages, the live
//! browser session for client-rendered ones.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::browser::BrowserSession;
use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Anything that can turn a URL into page markup.
#[async_trait]
pub trait PageSource: Send {
    /// Retrieve the markup behind `url`.
    ///
    /// # Errors
    ///
    /// A non-success response or a transport failure.
    async fn fetch_page(&mut self, url: &str) -> Result<String, ScraperError>;
}

/// HTTP client for detail pages.
///
/// Transient errors (429, 5xx, network failures) are retried with
/// exponential backoff up to `max_retries` additional attempts.
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with the given timeout, `User-Agent` and
    /// retry policy. `max_retries = 0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// One GET without status interpretation.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Http`] on network or body-read failure.
    pub async fn fetch(&self, url: &str) -> Result<(StatusCode, String), ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "es-CR,es;q=0.9")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// GET `url` and return its body, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network failure after all retries.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let (status, body) = self.fetch(url).await?;
            if status.is_success() {
                return Ok(body);
            }
            let url = url.to_string();
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ScraperError::RateLimited { url });
            }
            if status == StatusCode::NOT_FOUND {
                return Err(ScraperError::NotFound { url });
            }
            Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            })
        })
        .await
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_page(&mut self, url: &str) -> Result<String, ScraperError> {
        self.fetch_html(url).await
    }
}

/// Pages rendered by a live browser session, read back after a settle pause.
pub struct BrowserPages<'a, B> {
    session: &'a mut B,
    settle: Duration,
}

impl<'a, B: BrowserSession> BrowserPages<'a, B> {
    pub fn new(session: &'a mut B, settle: Duration) -> Self {
        Self { session, settle }
    }
}

#[async_trait]
impl<B: BrowserSession> PageSource for BrowserPages<'_, B> {
    async fn fetch_page(&mut self, url: &str) -> Result<String, ScraperError> {
        self.session.navigate(url).await?;
        tokio::time::sleep(self.settle).await;
        self.session.page_source().await
    }
}
