use scraper::{ElementRef, Html};
use vitrina_core::fields::{
    DISCOUNT, END_DATE, MAIN_OFFER, OFFER_PRICE, ORIGINAL_PRICE, RATING, SOLD, START_DATE,
    SUB_OFFER_TITLE,
};
use vitrina_core::FieldMap;

use super::validity::parse_validity;
use super::{all, collapsed_text, first, first_in, Extraction, Gap};

const MAIN_OFFER_CSS: &str = "span.text-3xl";
const SUMMARY_CSS: &str = "#root > div:nth-of-type(4) > section > div:nth-of-type(1) \
     > div:nth-of-type(1) > div:nth-of-type(1) > div:nth-of-type(2)";
const CONDITIONS_CSS: &str = "#root > div:nth-of-type(4) > section > div:nth-of-type(1) \
     > div:nth-of-type(3) > div:nth-of-type(3) > div > ol > li:nth-of-type(1)";
const SUB_OFFER_CSS: &str = "div.pb-10";

fn required(document: &Html, field: &str, css: &str) -> Result<String, Gap> {
    first(document, css)
        .map(collapsed_text)
        .ok_or_else(|| Gap::new(field, format!("nothing matches `{css}`")))
}

fn summary_cell(document: &Html, field: &str, column: u8) -> Result<String, Gap> {
    let css = format!("{SUMMARY_CSS} > div:nth-of-type({column}) > div:nth-of-type(1) > span");
    required(document, field, &css)
}

fn sub_offer(block: ElementRef<'_>) -> Result<[(&'static str, String); 4], Gap> {
    let text = |field: &str, css: &str| {
        first_in(block, css)
            .map(collapsed_text)
            .ok_or_else(|| Gap::new(field, format!("sub-offer has no `{css}`")))
    };
    Ok([
        (SUB_OFFER_TITLE, text(SUB_OFFER_TITLE, "span.pb-2")?),
        (OFFER_PRICE, text(OFFER_PRICE, "span.font-medium.text-2xl")?),
        (ORIGINAL_PRICE, text(ORIGINAL_PRICE, "span.line-through")?),
        (DISCOUNT, text(DISCOUNT, "span.font-medium.text-2xl.ml-auto")?),
    ])
}

/// Campaign detail page: one record per sub-offer, each carrying the shared
/// campaign fields.
///
/// Sub-offer blocks missing any of their four elements are skipped and
/// reported in [`Extraction::gaps`].
///
/// # Errors
///
/// The [`Gap`] for the first missing campaign-level element (main title,
/// rating, sold count or conditions text).
pub fn extract_campaign(document: &Html) -> Result<Extraction, Gap> {
    let main_offer = required(document, MAIN_OFFER, MAIN_OFFER_CSS)?;
    let rating = summary_cell(document, RATING, 1)?;
    let sold = summary_cell(document, SOLD, 2)?;
    let conditions = required(document, "Conditions", CONDITIONS_CSS)?;
    let validity = parse_validity(&conditions);
    tracing::debug!(
        main_offer = %main_offer,
        pattern = ?validity.pattern,
        start = %validity.start,
        end = %validity.end,
        "parsed redemption window"
    );

    let mut extraction = Extraction::default();
    for block in all(document, SUB_OFFER_CSS) {
        match sub_offer(block) {
            Ok(offer) => {
                let mut fields = FieldMap::new();
                fields.insert(MAIN_OFFER.to_string(), main_offer.clone());
                for (name, value) in offer {
                    fields.insert(name.to_string(), value);
                }
                fields.insert(RATING.to_string(), rating.clone());
                fields.insert(SOLD.to_string(), sold.clone());
                fields.insert(START_DATE.to_string(), validity.start.clone());
                fields.insert(END_DATE.to_string(), validity.end.clone());
                extraction.records.push(fields);
            }
            Err(gap) => extraction.gaps.push(gap),
        }
    }
    Ok(extraction)
}

#[cfg(test)]
#[path = "campaign_test.rs"]
mod tests;
