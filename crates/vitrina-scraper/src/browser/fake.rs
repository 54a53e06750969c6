//! In-memory [`BrowserSession`] modelling the listing surfaces closely enough
//! to exercise enumeration and browser-backed fetching without a WebDriver.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{BrowserSession, Locator, SelectChoice};
use crate::enumerate::{PagedListing, ScrollListing};
use crate::error::ScraperError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FakeKind {
    Control(Locator),
    Item { href: String },
    Link { href: String },
    Next,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FakeElement {
    kind: FakeKind,
    generation: u64,
}

#[derive(Default)]
pub(crate) struct FakeBrowser {
    controls: Vec<Locator>,
    submit: Option<Locator>,
    item: Option<Locator>,
    item_link: Option<Locator>,
    next: Option<Locator>,
    pages: Vec<Vec<String>>,
    page: Option<usize>,
    endless: bool,

    scroll_link: Option<Locator>,
    batches: Vec<Vec<String>>,
    revealed: usize,

    sources: HashMap<String, String>,
    current_url: Option<String>,
    generation: u64,

    pub selections: Vec<(Locator, SelectChoice)>,
    pub navigations: Vec<String>,
    pub scrolls: usize,
    quit: Arc<AtomicBool>,
}

impl FakeBrowser {
    /// A paged listing whose result pages hold `pages[i]` hrefs.
    pub(crate) fn paged(listing: &PagedListing, pages: Vec<Vec<String>>) -> Self {
        let mut controls = vec![listing.form.clone(), listing.submit.clone()];
        controls.extend(listing.selections.iter().map(|s| s.control.clone()));
        Self {
            controls,
            submit: Some(listing.submit.clone()),
            item: Some(listing.item.clone()),
            item_link: listing.item_link.clone(),
            next: listing.next.clone(),
            pages,
            ..Self::default()
        }
    }

    /// A paged listing that always offers another page.
    pub(crate) fn endless(listing: &PagedListing) -> Self {
        Self {
            endless: true,
            ..Self::paged(listing, Vec::new())
        }
    }

    /// An infinite-scroll grid; each scroll reveals the next batch.
    pub(crate) fn scrolling(listing: &ScrollListing, batches: Vec<Vec<String>>) -> Self {
        Self {
            controls: vec![listing.grid.clone()],
            scroll_link: Some(listing.link.clone()),
            batches,
            revealed: 1,
            ..Self::default()
        }
    }

    /// A grid that grows on every scroll.
    pub(crate) fn endless_scroll(listing: &ScrollListing) -> Self {
        Self {
            endless: true,
            ..Self::scrolling(listing, Vec::new())
        }
    }

    /// Static documents served by `page_source` after navigating to their URL.
    pub(crate) fn with_sources(sources: HashMap<String, String>) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    /// Flag set once `quit` has been called.
    pub(crate) fn quit_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit)
    }

    fn element(&self, kind: FakeKind) -> FakeElement {
        FakeElement {
            kind,
            generation: self.generation,
        }
    }

    fn page_hrefs(&self) -> Vec<String> {
        match self.page {
            None => Vec::new(),
            Some(p) if self.endless => vec![format!("cardetail.cfm?c={}", p + 1)],
            Some(p) => self.pages.get(p).cloned().unwrap_or_default(),
        }
    }

    fn has_next(&self) -> bool {
        match self.page {
            None => false,
            Some(_) if self.endless => true,
            Some(p) => p + 1 < self.pages.len(),
        }
    }

    fn revealed_links(&self) -> Vec<String> {
        if self.endless {
            return (0..self.revealed)
                .map(|i| format!("https://www.yuplon.com/campaign/offer-{i}"))
                .collect();
        }
        self.batches
            .iter()
            .take(self.revealed)
            .flatten()
            .cloned()
            .collect()
    }

    fn matching(&self, locator: &Locator) -> Vec<FakeElement> {
        if self.controls.contains(locator) {
            return vec![self.element(FakeKind::Control(locator.clone()))];
        }
        if self.item.as_ref() == Some(locator) {
            return self
                .page_hrefs()
                .into_iter()
                .map(|href| self.element(FakeKind::Item { href }))
                .collect();
        }
        if self.next.as_ref() == Some(locator) && self.has_next() {
            return vec![self.element(FakeKind::Next)];
        }
        if self.scroll_link.as_ref() == Some(locator) {
            return self
                .revealed_links()
                .into_iter()
                .map(|href| self.element(FakeKind::Link { href }))
                .collect();
        }
        Vec::new()
    }
}

#[async_trait]
impl BrowserSession for FakeBrowser {
    type Element = FakeElement;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        self.navigations.push(url.to_string());
        self.current_url = Some(url.to_string());
        self.generation += 1;
        Ok(())
    }

    async fn find_element(
        &mut self,
        locator: &Locator,
    ) -> Result<Option<FakeElement>, ScraperError> {
        Ok(self.matching(locator).into_iter().next())
    }

    async fn find_elements(&mut self, locator: &Locator) -> Result<Vec<FakeElement>, ScraperError> {
        Ok(self.matching(locator))
    }

    async fn find_child(
        &mut self,
        parent: &FakeElement,
        locator: &Locator,
    ) -> Result<Option<FakeElement>, ScraperError> {
        match &parent.kind {
            FakeKind::Item { href } if self.item_link.as_ref() == Some(locator) => {
                Ok(Some(self.element(FakeKind::Link { href: href.clone() })))
            }
            _ => Ok(None),
        }
    }

    async fn attribute(
        &mut self,
        element: &FakeElement,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        match (&element.kind, name) {
            (FakeKind::Item { href } | FakeKind::Link { href }, "href") => Ok(Some(href.clone())),
            _ => Ok(None),
        }
    }

    async fn click(&mut self, element: &FakeElement) -> Result<(), ScraperError> {
        match &element.kind {
            FakeKind::Control(locator) if self.submit.as_ref() == Some(locator) => {
                self.page = Some(0);
                self.generation += 1;
            }
            FakeKind::Next => {
                self.page = self.page.map(|p| p + 1);
                self.generation += 1;
            }
            _ => {}
        }
        Ok(())
    }

    async fn select_option(
        &mut self,
        element: &FakeElement,
        choice: &SelectChoice,
    ) -> Result<(), ScraperError> {
        match &element.kind {
            FakeKind::Control(locator) => {
                self.selections.push((locator.clone(), choice.clone()));
                Ok(())
            }
            other => Err(ScraperError::browser(
                "select",
                format!("{other:?} is not a dropdown"),
            )),
        }
    }

    async fn scroll_into_view(&mut self, _element: &FakeElement) -> Result<(), ScraperError> {
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
        self.scrolls += 1;
        if self.endless {
            self.revealed += 1;
        } else {
            self.revealed = (self.revealed + 1).min(self.batches.len().max(1));
        }
        Ok(())
    }

    async fn page_extent(&mut self) -> Result<u64, ScraperError> {
        Ok(800 * self.revealed.max(1) as u64)
    }

    async fn page_source(&mut self) -> Result<String, ScraperError> {
        self.current_url
            .as_ref()
            .and_then(|url| self.sources.get(url))
            .cloned()
            .ok_or_else(|| ScraperError::browser("read page source", "no document loaded"))
    }

    async fn title(&mut self) -> Result<String, ScraperError> {
        Ok("Resultados".to_string())
    }

    async fn is_clickable(&mut self, _element: &FakeElement) -> Result<bool, ScraperError> {
        Ok(true)
    }

    async fn is_stale(&mut self, element: &FakeElement) -> Result<bool, ScraperError> {
        Ok(element.generation != self.generation)
    }

    async fn quit(self) -> Result<(), ScraperError> {
        self.quit.store(true, Ordering::SeqCst);
        Ok(())
    }
}
