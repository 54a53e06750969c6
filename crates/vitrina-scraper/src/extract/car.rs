use scraper::Html;
use vitrina_core::fields::{PRICE, VERSION, YEAR};
use vitrina_core::FieldMap;

use super::price::usd_price;
use super::{first, first_in, trimmed_text, two_column_rows, Gap};

/// New-car detail page: the technical sheet plus the banner title.
#[must_use]
pub fn extract_new_item(document: &Html) -> FieldMap {
    let mut fields = FieldMap::new();

    if let Some(sheet) = first(document, "#fichatecnica") {
        two_column_rows(sheet, &mut fields);
    }

    if let Some(banner) = first(document, "div.header-text h2") {
        fields.insert(VERSION.to_string(), trimmed_text(banner));
    }

    fields
}

/// Split a `"<make> <model> <year>"` heading into (version, year).
///
/// Headings with fewer than three tokens carry no reliable year.
pub(crate) fn split_title(title: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = title.split_whitespace().collect();
    match tokens.split_last() {
        Some((year, rest)) if tokens.len() >= 3 => Some((rest.join(" "), (*year).to_string())),
        _ => None,
    }
}

/// Used-car detail page: heading, price and the general-information table.
#[must_use]
pub fn extract_used_item(document: &Html) -> (FieldMap, Vec<Gap>) {
    let mut fields = FieldMap::new();
    let mut gaps = Vec::new();

    match first(document, "div.header-text div.carheader") {
        Some(header) => {
            if let Some(h1) = first_in(header, "h1") {
                if let Some((version, year)) = split_title(&trimmed_text(h1)) {
                    fields.insert(YEAR.to_string(), year);
                    fields.insert(VERSION.to_string(), version);
                }
            }
            match first_in(header, "h3") {
                Some(h3) => {
                    let price = match usd_price(&trimmed_text(h3)) {
                        Ok(price) => price,
                        Err(cleaned) => {
                            gaps.push(Gap::new(PRICE, format!("not an integer: {cleaned:?}")));
                            format!("$ {cleaned}")
                        }
                    };
                    fields.insert(PRICE.to_string(), price);
                }
                None => gaps.push(Gap::new(PRICE, "no price heading")),
            }
        }
        None => gaps.push(Gap::new("carheader", "no header block")),
    }

    if let Some(table) = first(document, "div.tab-content div#tab-1 table") {
        two_column_rows(table, &mut fields);
    }

    (fields, gaps)
}

#[cfg(test)]
#[path = "car_test.rs"]
mod tests;
