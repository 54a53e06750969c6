//! Pure aggregations over normalized records.
//!
//! Field lookups go through [`NormalizedRecord::lookup`], so the same
//! functions work on a per-family table and on the merged car table where
//! shared names carry a family suffix.

use indexmap::IndexMap;
use vitrina_core::fields::{DISCOUNT, MAIN_OFFER, OFFER_PRICE, PRICE, SOLD, VERSION, YEAR};
use vitrina_core::{FieldValue, NormalizedRecord};

/// Which end of a ranking to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    Highest,
    Lowest,
}

fn text_of(value: &FieldValue) -> Option<String> {
    if value.is_missing() {
        None
    } else {
        Some(value.to_string())
    }
}

fn number(record: &NormalizedRecord, name: &str) -> Option<f64> {
    record.lookup(name).and_then(FieldValue::as_f64)
}

fn label(record: &NormalizedRecord, name: &str) -> Option<String> {
    record.lookup(name).and_then(text_of)
}

fn rank(mut entries: Vec<(String, f64)>, ranking: Ranking, top_n: usize) -> Vec<(String, f64)> {
    match ranking {
        Ranking::Highest => entries.sort_by(|a, b| b.1.total_cmp(&a.1)),
        Ranking::Lowest => entries.sort_by(|a, b| a.1.total_cmp(&b.1)),
    }
    entries.truncate(top_n);
    entries
}

/// Mean price per model year, ascending by year.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_price_by_year(records: &[NormalizedRecord]) -> Vec<(i64, f64)> {
    let mut sums: IndexMap<i64, (f64, usize)> = IndexMap::new();
    for record in records {
        let (Some(year), Some(price)) = (
            record.lookup(YEAR).and_then(FieldValue::as_i64),
            number(record, PRICE),
        ) else {
            continue;
        };
        let entry = sums.entry(year).or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    let mut averages: Vec<(i64, f64)> = sums
        .into_iter()
        .map(|(year, (total, count))| (year, total / count as f64))
        .collect();
    averages.sort_by_key(|(year, _)| *year);
    averages
}

/// The `top_n` most frequent versions with their counts. Ties keep
/// first-seen order.
#[must_use]
pub fn most_common_versions(records: &[NormalizedRecord], top_n: usize) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for version in records.iter().filter_map(|r| label(r, VERSION)) {
        *counts.entry(version).or_default() += 1;
    }
    let mut counts: Vec<(String, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_n);
    counts
}

/// Versions ranked by their highest (`Ranking::Highest`) or lowest
/// (`Ranking::Lowest`) listed price.
#[must_use]
pub fn versions_by_price(
    records: &[NormalizedRecord],
    ranking: Ranking,
    top_n: usize,
) -> Vec<(String, f64)> {
    let mut extremes: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let (Some(version), Some(price)) = (label(record, VERSION), number(record, PRICE)) else {
            continue;
        };
        extremes
            .entry(version)
            .and_modify(|current| {
                *current = match ranking {
                    Ranking::Highest => current.max(price),
                    Ranking::Lowest => current.min(price),
                };
            })
            .or_insert(price);
    }
    rank(extremes.into_iter().collect(), ranking, top_n)
}

/// Sub-offers ranked by discount percentage, labelled by main offer.
#[must_use]
pub fn offers_by_discount(
    records: &[NormalizedRecord],
    ranking: Ranking,
    top_n: usize,
) -> Vec<(String, f64)> {
    let entries = records
        .iter()
        .filter_map(|r| Some((label(r, MAIN_OFFER)?, number(r, DISCOUNT)?)))
        .collect();
    rank(entries, ranking, top_n)
}

/// Main offers ranked by the sum of their sub-offer prices.
#[must_use]
pub fn offers_by_total_price(
    records: &[NormalizedRecord],
    ranking: Ranking,
    top_n: usize,
) -> Vec<(String, f64)> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let (Some(offer), Some(price)) = (label(record, MAIN_OFFER), number(record, OFFER_PRICE))
        else {
            continue;
        };
        *totals.entry(offer).or_default() += price;
    }
    rank(totals.into_iter().collect(), ranking, top_n)
}

/// `(price, sold)` pairs for every sub-offer carrying both.
#[must_use]
pub fn price_vs_sold(records: &[NormalizedRecord]) -> Vec<(f64, f64)> {
    records
        .iter()
        .filter_map(|r| Some((number(r, OFFER_PRICE)?, number(r, SOLD)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use vitrina_core::{ItemIdentifier, PageFamily};

    use super::*;

    fn car(family: PageFamily, version: &str, year: Option<i64>, price: Option<f64>) -> NormalizedRecord {
        let suffix = family.suffix();
        let mut fields = IndexMap::new();
        fields.insert(VERSION.to_string(), FieldValue::Text(version.to_string()));
        fields.insert(
            YEAR.to_string(),
            year.map_or(FieldValue::Missing, FieldValue::Integer),
        );
        fields.insert(
            format!("{PRICE}_{suffix}"),
            price.map_or(FieldValue::Missing, FieldValue::Number),
        );
        NormalizedRecord {
            identifier: ItemIdentifier::new(version),
            family,
            fields,
        }
    }

    fn offer(main: &str, price: f64, discount: f64, sold: Option<i64>) -> NormalizedRecord {
        let mut fields = IndexMap::new();
        fields.insert(MAIN_OFFER.to_string(), FieldValue::Text(main.to_string()));
        fields.insert(OFFER_PRICE.to_string(), FieldValue::Number(price));
        fields.insert(DISCOUNT.to_string(), FieldValue::Number(discount));
        fields.insert(
            SOLD.to_string(),
            sold.map_or(FieldValue::Missing, FieldValue::Integer),
        );
        NormalizedRecord {
            identifier: ItemIdentifier::new(main),
            family: PageFamily::Campaign,
            fields,
        }
    }

    #[test]
    fn average_price_groups_by_year_across_families() {
        let records = vec![
            car(PageFamily::UsedItem, "Corolla", Some(2021), Some(10_000.0)),
            car(PageFamily::NewItem, "Corolla", Some(2021), Some(20_000.0)),
            car(PageFamily::UsedItem, "Swift", Some(2019), Some(7_000.0)),
            car(PageFamily::UsedItem, "Swift", None, Some(1.0)),
            car(PageFamily::UsedItem, "Rio", Some(2019), None),
        ];

        assert_eq!(
            average_price_by_year(&records),
            vec![(2019, 7_000.0), (2021, 15_000.0)]
        );
    }

    #[test]
    fn common_versions_counts_and_truncates() {
        let records = vec![
            car(PageFamily::UsedItem, "Swift", None, None),
            car(PageFamily::UsedItem, "Corolla", None, None),
            car(PageFamily::UsedItem, "Corolla", None, None),
            car(PageFamily::UsedItem, "Rio", None, None),
        ];

        assert_eq!(
            most_common_versions(&records, 2),
            vec![("Corolla".to_string(), 2), ("Swift".to_string(), 1)]
        );
    }

    #[test]
    fn versions_rank_by_max_and_min_price() {
        let records = vec![
            car(PageFamily::UsedItem, "Corolla", None, Some(9_000.0)),
            car(PageFamily::NewItem, "Corolla", None, Some(25_000.0)),
            car(PageFamily::UsedItem, "Swift", None, Some(6_000.0)),
            car(PageFamily::UsedItem, "Hilux", None, Some(40_000.0)),
        ];

        assert_eq!(
            versions_by_price(&records, Ranking::Highest, 2),
            vec![("Hilux".to_string(), 40_000.0), ("Corolla".to_string(), 25_000.0)]
        );
        assert_eq!(
            versions_by_price(&records, Ranking::Lowest, 2),
            vec![("Swift".to_string(), 6_000.0), ("Corolla".to_string(), 9_000.0)]
        );
    }

    #[test]
    fn discount_ranking_keeps_each_sub_offer() {
        let records = vec![
            offer("Spa", 15_000.0, 50.0, Some(10)),
            offer("Sushi", 12_900.0, 70.0, Some(3)),
            offer("Spa", 25_000.0, 20.0, None),
        ];

        assert_eq!(
            offers_by_discount(&records, Ranking::Highest, 2),
            vec![("Sushi".to_string(), 70.0), ("Spa".to_string(), 50.0)]
        );
        assert_eq!(
            offers_by_discount(&records, Ranking::Lowest, 1),
            vec![("Spa".to_string(), 20.0)]
        );
    }

    #[test]
    fn total_price_sums_sub_offers_per_main_offer() {
        let records = vec![
            offer("Spa", 15_000.0, 50.0, None),
            offer("Sushi", 12_900.0, 70.0, None),
            offer("Spa", 25_000.0, 20.0, None),
        ];

        assert_eq!(
            offers_by_total_price(&records, Ranking::Highest, 10),
            vec![("Spa".to_string(), 40_000.0), ("Sushi".to_string(), 12_900.0)]
        );
    }

    #[test]
    fn scatter_points_skip_missing_sold() {
        let records = vec![
            offer("Spa", 15_000.0, 50.0, Some(10)),
            offer("Sushi", 12_900.0, 70.0, None),
        ];

        assert_eq!(price_vs_sold(&records), vec![(15_000.0, 10.0)]);
    }
}
