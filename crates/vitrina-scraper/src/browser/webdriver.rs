use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Value};

use super::{BrowserSession, Locator, SelectChoice};
use crate::error::ScraperError;

/// [`BrowserSession`] backed by a WebDriver server (chromedriver).
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Opens a new Chrome session on the WebDriver server at `webdriver_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::SessionStart`] if the server is unreachable or
    /// refuses the session.
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, ScraperError> {
        let mut args = vec!["--window-size=1366,900", "--disable-gpu"];
        if headless {
            args.push("--headless=new");
        }
        let mut caps = serde_json::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let mut builder = ClientBuilder::native();
        builder.capabilities(caps);
        let client = builder
            .connect(webdriver_url)
            .await
            .map_err(|e| ScraperError::SessionStart {
                webdriver_url: webdriver_url.to_string(),
                reason: e.to_string(),
            })?;
        tracing::info!(webdriver_url, headless, "browser session started");
        Ok(Self { client })
    }

    async fn run_on(
        &self,
        script: &str,
        element: &Element,
        action: &str,
    ) -> Result<Value, ScraperError> {
        let arg =
            serde_json::to_value(element).map_err(|e| ScraperError::browser(action, e))?;
        self.client
            .execute(script, vec![arg])
            .await
            .map_err(|e| ScraperError::browser(action, e))
    }
}

fn to_fantoccini(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator {
        Locator::Css(s) => fantoccini::Locator::Css(s),
        Locator::XPath(s) => fantoccini::Locator::XPath(s),
    }
}

fn optional(
    result: Result<Element, CmdError>,
    locator: &Locator,
) -> Result<Option<Element>, ScraperError> {
    match result {
        Ok(el) => Ok(Some(el)),
        Err(e) if e.is_no_such_element() => Ok(None),
        Err(e) => Err(ScraperError::browser(format!("find {locator}"), e)),
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        tracing::debug!(url, "navigating");
        self.client
            .goto(url)
            .await
            .map_err(|e| ScraperError::browser(format!("navigate to {url}"), e))
    }

    async fn find_element(&mut self, locator: &Locator) -> Result<Option<Element>, ScraperError> {
        optional(self.client.find(to_fantoccini(locator)).await, locator)
    }

    async fn find_elements(&mut self, locator: &Locator) -> Result<Vec<Element>, ScraperError> {
        self.client
            .find_all(to_fantoccini(locator))
            .await
            .map_err(|e| ScraperError::browser(format!("find all {locator}"), e))
    }

    async fn find_child(
        &mut self,
        parent: &Element,
        locator: &Locator,
    ) -> Result<Option<Element>, ScraperError> {
        optional(parent.find(to_fantoccini(locator)).await, locator)
    }

    async fn attribute(
        &mut self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        element
            .attr(name)
            .await
            .map_err(|e| ScraperError::browser(format!("read attribute {name}"), e))
    }

    async fn click(&mut self, element: &Element) -> Result<(), ScraperError> {
        // Script click; overlays on both sites intercept native clicks.
        self.run_on("arguments[0].click();", element, "click").await?;
        Ok(())
    }

    async fn select_option(
        &mut self,
        element: &Element,
        choice: &SelectChoice,
    ) -> Result<(), ScraperError> {
        let result = match choice {
            SelectChoice::Value(value) => element.select_by_value(value).await,
            SelectChoice::VisibleText(text) => element.select_by_label(text).await,
        };
        result.map_err(|e| ScraperError::browser(format!("select {choice:?}"), e))
    }

    async fn scroll_into_view(&mut self, element: &Element) -> Result<(), ScraperError> {
        self.run_on("arguments[0].scrollIntoView();", element, "scroll into view")
            .await?;
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        self.client
            .execute("window.scrollTo(0, document.body.scrollHeight);", vec![])
            .await
            .map_err(|e| ScraperError::browser("scroll to bottom", e))?;
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    async fn page_extent(&mut self) -> Result<u64, ScraperError> {
        let value = self
            .client
            .execute("return document.body.scrollHeight;", vec![])
            .await
            .map_err(|e| ScraperError::browser("measure page extent", e))?;
        value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.max(0.0).round() as u64))
            .ok_or_else(|| {
                ScraperError::browser("measure page extent", format!("non-numeric height {value}"))
            })
    }

    async fn page_source(&mut self) -> Result<String, ScraperError> {
        self.client
            .source()
            .await
            .map_err(|e| ScraperError::browser("read page source", e))
    }

    async fn title(&mut self) -> Result<String, ScraperError> {
        self.client
            .title()
            .await
            .map_err(|e| ScraperError::browser("read title", e))
    }

    async fn is_clickable(&mut self, element: &Element) -> Result<bool, ScraperError> {
        let displayed = element
            .is_displayed()
            .await
            .map_err(|e| ScraperError::browser("check displayed", e))?;
        if !displayed {
            return Ok(false);
        }
        element
            .is_enabled()
            .await
            .map_err(|e| ScraperError::browser("check enabled", e))
    }

    async fn is_stale(&mut self, element: &Element) -> Result<bool, ScraperError> {
        // Any command on a detached element reference fails.
        match element.is_enabled().await {
            Ok(_) => Ok(false),
            Err(e) => {
                tracing::debug!(error = %e, "element reference no longer usable");
                Ok(true)
            }
        }
    }

    async fn quit(self) -> Result<(), ScraperError> {
        self.client
            .close()
            .await
            .map_err(|e| ScraperError::browser("quit session", e))?;
        tracing::info!("browser session closed");
        Ok(())
    }
}
