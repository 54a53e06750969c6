//! Detail fetching: identifiers in, tagged raw records out.

use vitrina_core::family::fill_template;
use vitrina_core::{ItemIdentifier, PageFamily, RawRecord};

use crate::client::PageSource;
use crate::error::ScraperError;
use crate::extract::extract;

/// An identifier whose page could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub identifier: ItemIdentifier,
    pub url: String,
    pub reason: String,
}

/// A field (or, for campaigns, a whole page or sub-offer) that was skipped
/// because the markup lacked it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGap {
    pub identifier: ItemIdentifier,
    pub field: String,
    pub detail: String,
}

/// Outcome of one fetch pass over a family's identifiers.
#[derive(Debug, Default)]
pub struct FetchBatch {
    /// Records in identifier order.
    pub records: Vec<RawRecord>,
    pub failures: Vec<FetchFailure>,
    pub gaps: Vec<ItemGap>,
}

/// Fetch and extract every identifier's detail page.
///
/// `template` must contain an `{id}` placeholder. A transport failure is
/// logged, recorded in [`FetchBatch::failures`] and the identifier skipped.
/// A campaign page missing a campaign-level element is recorded as a gap
/// and skipped. The rest of the batch always runs.
pub async fn fetch_details<S>(
    source: &mut S,
    family: PageFamily,
    template: &str,
    identifiers: &[ItemIdentifier],
) -> FetchBatch
where
    S: PageSource + ?Sized,
{
    let mut batch = FetchBatch::default();
    let total = identifiers.len();

    for (index, identifier) in identifiers.iter().enumerate() {
        let url = fill_template(template, identifier);
        tracing::info!(%family, %identifier, progress = index + 1, total, "fetching detail page");

        let html = match source.fetch_page(&url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(
                    %family,
                    %identifier,
                    url = %url,
                    error = %e,
                    "detail fetch failed, skipping"
                );
                batch.failures.push(FetchFailure {
                    identifier: identifier.clone(),
                    url,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match extract(family, &html, &url) {
            Ok(extraction) => {
                for gap in extraction.gaps {
                    tracing::warn!(
                        %family,
                        %identifier,
                        field = %gap.field,
                        detail = %gap.detail,
                        "extraction gap"
                    );
                    batch.gaps.push(ItemGap {
                        identifier: identifier.clone(),
                        field: gap.field,
                        detail: gap.detail,
                    });
                }
                batch.records.extend(
                    extraction
                        .records
                        .into_iter()
                        .map(|fields| RawRecord::new(identifier.clone(), family, fields)),
                );
            }
            Err(ScraperError::ExtractionGap { url, field }) => {
                tracing::warn!(
                    %family,
                    %identifier,
                    url = %url,
                    field = %field,
                    "page lacks required element, skipping"
                );
                batch.gaps.push(ItemGap {
                    identifier: identifier.clone(),
                    field,
                    detail: format!("page skipped: {url}"),
                });
            }
            Err(e) => {
                tracing::warn!(
                    %family,
                    %identifier,
                    url = %url,
                    error = %e,
                    "extraction failed, skipping"
                );
                batch.failures.push(FetchFailure {
                    identifier: identifier.clone(),
                    url,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        %family,
        records = batch.records.len(),
        failures = batch.failures.len(),
        gaps = batch.gaps.len(),
        "detail fetch finished"
    );
    batch
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
