//! Listing enumeration: drive a browser through a listing surface and
//! collect the identifiers of every item it shows.
//!
//! Two strategies cover both sites. [`enumerate_paged`] fills a search form,
//! submits it and follows "next page" controls until none is left.
//! [`enumerate_scroll`] keeps scrolling an infinite grid until the document
//! stops growing.

pub mod listings;

use indexmap::IndexSet;
use url::Url;
use vitrina_core::{ItemIdentifier, Pacing, PageFamily};

use crate::browser::{BrowserSession, Locator, SelectChoice, WaitCondition};
use crate::error::ScraperError;

/// One dropdown selection applied before submitting a search form.
#[derive(Debug, Clone)]
pub struct SelectStep {
    pub control: Locator,
    pub choice: SelectChoice,
}

/// A search form followed by paginated results.
#[derive(Debug, Clone)]
pub struct PagedListing {
    pub name: String,
    pub family: PageFamily,
    pub url: String,
    /// Element whose presence means the form is ready.
    pub form: Locator,
    pub selections: Vec<SelectStep>,
    pub submit: Locator,
    /// One per result item.
    pub item: Locator,
    /// Link inside `item` carrying the href; `None` when `item` is the link.
    pub item_link: Option<Locator>,
    /// "Next page" control; `None` for single-page listings.
    pub next: Option<Locator>,
}

/// A grid that loads more items as the page is scrolled.
#[derive(Debug, Clone)]
pub struct ScrollListing {
    pub name: String,
    pub family: PageFamily,
    pub url: String,
    pub grid: Locator,
    /// Detail links inside the grid.
    pub link: Locator,
}

/// Identifiers found by one enumeration pass, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub identifiers: Vec<ItemIdentifier>,
    /// Repeat sightings collapsed into an earlier identifier.
    pub duplicates: usize,
    /// Result pages (or scroll iterations) visited.
    pub pages: usize,
}

/// Ordered set of identifiers that counts repeats.
struct IdentifierCollector {
    family: PageFamily,
    /// Listing page that relative links are resolved against.
    page: Url,
    seen: IndexSet<ItemIdentifier>,
    duplicates: usize,
}

impl IdentifierCollector {
    fn new(family: PageFamily, page: &str) -> Result<Self, ScraperError> {
        let page = Url::parse(page).map_err(|source| ScraperError::ListingUrl {
            url: page.to_string(),
            source,
        })?;
        Ok(Self {
            family,
            page,
            seen: IndexSet::new(),
            duplicates: 0,
        })
    }

    /// Record the identifier in `href`; `true` if it was not seen before.
    fn add_href(&mut self, href: &str) -> bool {
        let parsed = match self.family {
            PageFamily::Campaign => ItemIdentifier::from_link_href(href, &self.page),
            PageFamily::NewItem | PageFamily::UsedItem => ItemIdentifier::from_query_href(href),
        };
        let Some(id) = parsed else {
            tracing::debug!(href, "link carries no identifier");
            return false;
        };
        if self.seen.insert(id) {
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    fn finish(self, listing: &str, pages: usize) -> Enumeration {
        if self.duplicates > 0 {
            tracing::warn!(
                listing,
                duplicates = self.duplicates,
                "duplicate identifiers collapsed"
            );
        }
        tracing::info!(
            listing,
            identifiers = self.seen.len(),
            pages,
            "enumeration finished"
        );
        Enumeration {
            identifiers: self.seen.into_iter().collect(),
            duplicates: self.duplicates,
            pages,
        }
    }
}

/// Scroll `element` into view, settle, click.
async fn settle_and_click<B: BrowserSession>(
    session: &mut B,
    element: &B::Element,
    pacing: &Pacing,
) -> Result<(), ScraperError> {
    session.scroll_into_view(element).await?;
    tokio::time::sleep(pacing.click_settle).await;
    session.click(element).await
}

/// Enumerate a search-form listing across all of its result pages.
///
/// A listing whose search returns nothing yields an empty [`Enumeration`].
/// A missing or vanished "next page" control ends the walk normally.
///
/// # Errors
///
/// - [`ScraperError::NavigationTimeout`] if the form, a dropdown, the submit
///   control or the next page's items never appear.
/// - [`ScraperError::EnumerationStalled`] if more than `pacing.max_pages`
///   pages would be visited.
/// - Browser command failures as returned by the session.
pub async fn enumerate_paged<B: BrowserSession>(
    session: &mut B,
    listing: &PagedListing,
    pacing: &Pacing,
) -> Result<Enumeration, ScraperError> {
    let timeout = pacing.wait_timeout;
    tracing::info!(listing = %listing.name, url = %listing.url, "enumerating paged listing");

    session.navigate(&listing.url).await?;
    session
        .wait_until(WaitCondition::Present(&listing.form), timeout)
        .await?;

    for step in &listing.selections {
        let control = session
            .wait_until(WaitCondition::Present(&step.control), timeout)
            .await?;
        session.select_option(&control, &step.choice).await?;
        tracing::debug!(control = %step.control, choice = ?step.choice, "selected option");
    }

    let submit = session
        .wait_until(WaitCondition::Clickable(&listing.submit), timeout)
        .await?;
    settle_and_click(session, &submit, pacing).await?;
    tokio::time::sleep(pacing.page_settle).await;

    match session.title().await {
        Ok(title) => tracing::info!(listing = %listing.name, title = %title, "search submitted"),
        Err(e) => tracing::debug!(error = %e, "could not read page title"),
    }

    let mut collector = IdentifierCollector::new(listing.family, &listing.url)?;
    let mut first_item = match session
        .wait_until(WaitCondition::Present(&listing.item), timeout)
        .await
    {
        Ok(item) => item,
        Err(ScraperError::NavigationTimeout { .. }) => {
            tracing::info!(listing = %listing.name, "search returned no results");
            return Ok(collector.finish(&listing.name, 0));
        }
        Err(e) => return Err(e),
    };

    let mut pages = 0usize;
    loop {
        pages += 1;
        let items = session.find_elements(&listing.item).await?;
        let mut added = 0usize;
        for item in &items {
            let link = match &listing.item_link {
                Some(locator) => session.find_child(item, locator).await?,
                None => Some(item.clone()),
            };
            let Some(link) = link else { continue };
            if let Some(href) = session.attribute(&link, "href").await? {
                if collector.add_href(&href) {
                    added += 1;
                }
            }
        }
        tracing::debug!(
            listing = %listing.name,
            page = pages,
            items = items.len(),
            added,
            "read result page"
        );

        let Some(next_locator) = &listing.next else {
            break;
        };
        let next = match session
            .wait_until(WaitCondition::Clickable(next_locator), timeout)
            .await
        {
            Ok(next) => next,
            Err(ScraperError::NavigationTimeout { .. }) => {
                tracing::debug!(listing = %listing.name, page = pages, "no next-page control");
                break;
            }
            Err(e) => return Err(e),
        };
        if pages >= pacing.max_pages {
            return Err(ScraperError::EnumerationStalled {
                listing: listing.name.clone(),
                max_pages: pacing.max_pages,
            });
        }

        settle_and_click(session, &next, pacing).await?;
        session
            .wait_until(WaitCondition::Stale(&first_item), timeout)
            .await?;
        first_item = session
            .wait_until(WaitCondition::Present(&listing.item), timeout)
            .await?;
    }

    Ok(collector.finish(&listing.name, pages))
}

/// Enumerate an infinite-scroll grid.
///
/// Scrolls to the bottom, waits `pacing.scroll_settle`, collects every
/// visible detail link and stops once the document height no longer grows.
/// Links seen again on later iterations are the same items and are not
/// counted as duplicates.
///
/// # Errors
///
/// - [`ScraperError::NavigationTimeout`] if the grid never appears.
/// - [`ScraperError::EnumerationStalled`] if the page is still growing after
///   `pacing.max_pages` scrolls.
pub async fn enumerate_scroll<B: BrowserSession>(
    session: &mut B,
    listing: &ScrollListing,
    pacing: &Pacing,
) -> Result<Enumeration, ScraperError> {
    tracing::info!(listing = %listing.name, url = %listing.url, "enumerating scrolling listing");

    session.navigate(&listing.url).await?;
    session
        .wait_until(WaitCondition::Present(&listing.grid), pacing.wait_timeout)
        .await?;

    let mut collector = IdentifierCollector::new(listing.family, &listing.url)?;
    let mut extent = session.page_extent().await?;
    let mut iterations = 0usize;

    loop {
        if iterations >= pacing.max_pages {
            return Err(ScraperError::EnumerationStalled {
                listing: listing.name.clone(),
                max_pages: pacing.max_pages,
            });
        }
        iterations += 1;

        session.scroll_to_bottom().await?;
        tokio::time::sleep(pacing.scroll_settle).await;

        for link in session.find_elements(&listing.link).await? {
            if let Some(href) = session.attribute(&link, "href").await? {
                collector.add_href(&href);
            }
        }

        let new_extent = session.page_extent().await?;
        tracing::debug!(
            listing = %listing.name,
            iteration = iterations,
            extent = new_extent,
            collected = collector.seen.len(),
            "scrolled"
        );
        if new_extent == extent {
            break;
        }
        extent = new_extent;
    }

    // Re-sightings across scroll snapshots are expected.
    collector.duplicates = 0;
    Ok(collector.finish(&listing.name, iterations))
}

#[cfg(test)]
#[path = "enumerate_test.rs"]
mod tests;
