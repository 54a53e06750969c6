//! Field extraction from detail-page markup.
//!
//! Extractors are pure: they take the page source and return flat
//! label → value maps. Car pages yield exactly one map; campaign pages yield
//! one map per sub-offer.

mod campaign;
mod car;
mod price;
mod validity;

use scraper::{ElementRef, Html, Selector};
use vitrina_core::{FieldMap, PageFamily};

use crate::error::ScraperError;

pub use campaign::extract_campaign;
pub use car::{extract_new_item, extract_used_item};
pub use price::{format_usd, usd_price, COLONES_PER_USD};
pub use validity::{parse_validity, Validity, ValidityPattern};

/// A field the page did not provide in the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gap {
    pub field: String,
    pub detail: String,
}

impl Gap {
    pub(crate) fn new(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

/// Records extracted from one page plus any item-level gaps met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<FieldMap>,
    pub gaps: Vec<Gap>,
}

/// Dispatch to the extractor for `family`.
///
/// # Errors
///
/// [`ScraperError::ExtractionGap`] when a campaign page lacks one of its
/// campaign-level elements. Car pages never fail; absent sections simply
/// contribute no fields.
pub fn extract(family: PageFamily, html: &str, url: &str) -> Result<Extraction, ScraperError> {
    let document = Html::parse_document(html);
    match family {
        PageFamily::NewItem => Ok(Extraction {
            records: vec![extract_new_item(&document)],
            gaps: Vec::new(),
        }),
        PageFamily::UsedItem => {
            let (fields, gaps) = extract_used_item(&document);
            Ok(Extraction {
                records: vec![fields],
                gaps,
            })
        }
        PageFamily::Campaign => extract_campaign(&document).map_err(|gap| {
            ScraperError::ExtractionGap {
                url: url.to_string(),
                field: gap.field,
            }
        }),
    }
}

pub(crate) fn first_in<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

pub(crate) fn first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

pub(crate) fn all_in<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

pub(crate) fn all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Concatenated descendant text, trimmed at both ends.
pub(crate) fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Descendant text with every whitespace run collapsed to one space.
pub(crate) fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every `tr` under `table` with exactly two `td` cells, as label → value.
/// A repeated label keeps the last value.
pub(crate) fn two_column_rows(table: ElementRef<'_>, fields: &mut FieldMap) {
    for row in all_in(table, "tr") {
        let cells = all_in(row, "td");
        if let [label, value] = cells.as_slice() {
            fields.insert(trimmed_text(*label), trimmed_text(*value));
        }
    }
}
