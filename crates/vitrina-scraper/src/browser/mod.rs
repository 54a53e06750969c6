//! Narrow capability interface over a live browser session.
//!
//! Enumeration and campaign fetching drive the browser only through
//! [`BrowserSession`], so tests substitute an in-memory page model for the
//! WebDriver-backed [`WebDriverSession`].

mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::ScraperError;

pub use webdriver::WebDriverSession;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How an element is located on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(path: impl Into<String>) -> Self {
        Locator::XPath(path.into())
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::XPath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// Which option of a dropdown to select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectChoice {
    Value(String),
    VisibleText(String),
}

/// A condition polled by [`BrowserSession::wait_until`].
#[derive(Debug)]
pub enum WaitCondition<'a, E> {
    /// At least one element matches.
    Present(&'a Locator),
    /// A matching element is displayed and enabled.
    Clickable(&'a Locator),
    /// The given element is detached from the document.
    Stale(&'a E),
}

impl<E> WaitCondition<'_, E> {
    fn describe(&self) -> String {
        match self {
            WaitCondition::Present(locator) => format!("presence of {locator}"),
            WaitCondition::Clickable(locator) => format!("clickable {locator}"),
            WaitCondition::Stale(_) => "previous page to go stale".to_string(),
        }
    }
}

#[async_trait]
pub trait BrowserSession: Send {
    type Element: Clone + Send + Sync;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError>;

    /// First element matching `locator`, or `None` if nothing matches.
    async fn find_element(
        &mut self,
        locator: &Locator,
    ) -> Result<Option<Self::Element>, ScraperError>;

    async fn find_elements(&mut self, locator: &Locator)
        -> Result<Vec<Self::Element>, ScraperError>;

    async fn find_child(
        &mut self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Option<Self::Element>, ScraperError>;

    async fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, ScraperError>;

    async fn click(&mut self, element: &Self::Element) -> Result<(), ScraperError>;

    async fn select_option(
        &mut self,
        element: &Self::Element,
        choice: &SelectChoice,
    ) -> Result<(), ScraperError>;

    async fn scroll_into_view(&mut self, element: &Self::Element) -> Result<(), ScraperError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError>;

    /// Current scrollable height of the document in pixels.
    async fn page_extent(&mut self) -> Result<u64, ScraperError>;

    async fn page_source(&mut self) -> Result<String, ScraperError>;

    async fn title(&mut self) -> Result<String, ScraperError>;

    async fn is_clickable(&mut self, element: &Self::Element) -> Result<bool, ScraperError>;

    async fn is_stale(&mut self, element: &Self::Element) -> Result<bool, ScraperError>;

    /// End the session. Consumes the handle so no command can follow it.
    async fn quit(self) -> Result<(), ScraperError>
    where
        Self: Sized;

    /// Poll `condition` until it holds or `timeout` elapses.
    ///
    /// Returns the matched element for `Present` / `Clickable` and the
    /// (now detached) element for `Stale`.
    ///
    /// # Errors
    ///
    /// [`ScraperError::NavigationTimeout`] when the condition never holds;
    /// browser command failures are returned as they occur.
    async fn wait_until(
        &mut self,
        condition: WaitCondition<'_, Self::Element>,
        timeout: Duration,
    ) -> Result<Self::Element, ScraperError> {
        let deadline = Instant::now() + timeout;
        loop {
            let satisfied = match &condition {
                WaitCondition::Present(locator) => self.find_element(locator).await?,
                WaitCondition::Clickable(locator) => match self.find_element(locator).await? {
                    Some(el) => {
                        if self.is_clickable(&el).await? {
                            Some(el)
                        } else {
                            None
                        }
                    }
                    None => None,
                },
                WaitCondition::Stale(el) => {
                    if self.is_stale(el).await? {
                        Some((*el).clone())
                    } else {
                        None
                    }
                }
            };
            if let Some(el) = satisfied {
                return Ok(el);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(ScraperError::NavigationTimeout {
                    condition: condition.describe(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}
