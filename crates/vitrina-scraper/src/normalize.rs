//! Reconciliation of raw records from several page families into one table.
//!
//! Field names are first canonicalized per family, then any name used by
//! two or more of the merged families gets a per-family suffix. Values are
//! coerced by the role of their unsuffixed name (see
//! [`vitrina_core::fields::role_of`]).

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use vitrina_core::fields::{canonical_name, role_of, FieldRole};
use vitrina_core::{FieldValue, NormalizedRecord, PageFamily, RawRecord};

use crate::extract::COLONES_PER_USD;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed year {value:?} on {family} item {identifier}")]
    MalformedYear {
        identifier: String,
        family: PageFamily,
        value: String,
    },
}

/// The reconciled table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub records: Vec<NormalizedRecord>,
    /// Field columns in first-seen order; every record carries all of them.
    pub columns: Vec<String>,
    /// Rows dropped because a price or percentage did not parse.
    pub dropped_rows: usize,
}

enum Coerced {
    Value(FieldValue),
    DropRow,
}

fn strip_price(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '$' | '¢' | '₡' | ',') && !c.is_whitespace())
        .collect()
}

/// Parse a price. Car prices quoted in colones are converted to dollars by
/// floor division; campaign prices stay in colones.
fn parse_price(family: PageFamily, trimmed: &str) -> Option<f64> {
    let cleaned = strip_price(trimmed);
    if family != PageFamily::Campaign && trimmed.contains(['¢', '₡']) {
        return cleaned
            .parse::<i64>()
            .ok()
            .map(|colones| colones.div_euclid(COLONES_PER_USD) as f64);
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn coerce(
    role: FieldRole,
    name: &str,
    raw: &str,
    record: &RawRecord,
) -> Result<Coerced, NormalizeError> {
    let trimmed = raw.trim();
    let value = match role {
        FieldRole::Text => FieldValue::Text(raw.to_string()),
        FieldRole::Price | FieldRole::Percent => {
            let parsed = if role == FieldRole::Price {
                parse_price(record.family, trimmed)
            } else {
                trimmed
                    .replace('%', "")
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
            };
            match parsed {
                _ if trimmed.is_empty() => FieldValue::Missing,
                Some(n) => FieldValue::Number(n),
                None => {
                    tracing::warn!(
                        identifier = %record.identifier,
                        family = %record.family,
                        field = name,
                        value = raw,
                        "malformed price, dropping row"
                    );
                    return Ok(Coerced::DropRow);
                }
            }
        }
        FieldRole::Count => {
            let cleaned: String = trimmed
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                FieldValue::Missing
            } else if let Ok(n) = cleaned.parse::<i64>() {
                FieldValue::Integer(n)
            } else {
                tracing::warn!(
                    identifier = %record.identifier,
                    field = name,
                    value = raw,
                    "count is not an integer, leaving empty"
                );
                FieldValue::Missing
            }
        }
        FieldRole::Year => {
            if trimmed.is_empty() {
                FieldValue::Missing
            } else {
                let year = trimmed
                    .parse::<i64>()
                    .map_err(|_| NormalizeError::MalformedYear {
                        identifier: record.identifier.to_string(),
                        family: record.family,
                        value: raw.to_string(),
                    })?;
                FieldValue::Integer(year)
            }
        }
    };
    Ok(Coerced::Value(value))
}

/// Coerce every field of one record into its output column, or `None` if
/// the row is dropped. Prices and percentages are settled before any year
/// is checked, so a dropped row never fails the call.
fn coerce_record(
    record: &RawRecord,
    collisions: &HashSet<String>,
) -> Result<Option<IndexMap<String, FieldValue>>, NormalizeError> {
    let named: Vec<(String, String, FieldRole, &str)> = record
        .fields
        .iter()
        .map(|(name, raw)| {
            let name = canonical(record.family, name);
            let column = if collisions.contains(&name) {
                format!("{name}_{}", record.family.suffix())
            } else {
                name.clone()
            };
            let role = role_of(&name);
            (column, name, role, raw.as_str())
        })
        .collect();

    let mut values: Vec<Option<FieldValue>> = vec![None; named.len()];
    let drops_row = |role: &FieldRole| matches!(role, FieldRole::Price | FieldRole::Percent);

    for pass_prices in [true, false] {
        for (slot, (_, name, role, raw)) in values.iter_mut().zip(&named) {
            if drops_row(role) != pass_prices {
                continue;
            }
            match coerce(*role, name, raw, record)? {
                Coerced::Value(value) => *slot = Some(value),
                Coerced::DropRow => return Ok(None),
            }
        }
    }

    Ok(Some(
        named
            .into_iter()
            .zip(values)
            .map(|((column, ..), value)| (column, value.unwrap_or(FieldValue::Missing)))
            .collect(),
    ))
}

/// Field name after the family's canonical rename.
fn canonical(family: PageFamily, name: &str) -> String {
    canonical_name(family, name).map_or_else(|| name.to_string(), str::to_string)
}

/// Names used by two or more distinct families across `lists`.
fn colliding_names(lists: &[&[RawRecord]]) -> HashSet<String> {
    let mut families_by_name: HashMap<String, HashSet<PageFamily>> = HashMap::new();
    for record in lists.iter().flat_map(|list| list.iter()) {
        for name in record.fields.keys() {
            families_by_name
                .entry(canonical(record.family, name))
                .or_default()
                .insert(record.family);
        }
    }
    families_by_name
        .into_iter()
        .filter(|(_, families)| families.len() > 1)
        .map(|(name, _)| name)
        .collect()
}

/// Merge record lists (typically one per family) into one reconciled table.
///
/// Records keep their input order. Rows whose price or percentage does not
/// parse are dropped and counted in [`NormalizedTable::dropped_rows`].
///
/// # Errors
///
/// [`NormalizeError::MalformedYear`] if any non-empty year value is not an
/// integer. The whole call fails; no partial table is returned.
pub fn normalize_records(lists: &[&[RawRecord]]) -> Result<NormalizedTable, NormalizeError> {
    let collisions = colliding_names(lists);
    if !collisions.is_empty() {
        let mut names: Vec<&str> = collisions.iter().map(String::as_str).collect();
        names.sort_unstable();
        tracing::debug!(?names, "suffixing colliding field names");
    }

    let mut columns: IndexSet<String> = IndexSet::new();
    let mut records = Vec::new();
    let mut dropped_rows = 0usize;

    for record in lists.iter().flat_map(|list| list.iter()) {
        let Some(fields) = coerce_record(record, &collisions)? else {
            dropped_rows += 1;
            continue;
        };
        columns.extend(fields.keys().cloned());
        records.push(NormalizedRecord {
            identifier: record.identifier.clone(),
            family: record.family,
            fields,
        });
    }

    for record in &mut records {
        let mut filled = IndexMap::with_capacity(columns.len());
        for column in &columns {
            let value = record
                .fields
                .shift_remove(column)
                .unwrap_or(FieldValue::Missing);
            filled.insert(column.clone(), value);
        }
        record.fields = filled;
    }

    if dropped_rows > 0 {
        tracing::warn!(dropped_rows, "rows dropped during price coercion");
    }
    tracing::info!(
        records = records.len(),
        columns = columns.len(),
        dropped_rows,
        "normalized records"
    );

    Ok(NormalizedTable {
        records,
        columns: columns.into_iter().collect(),
        dropped_rows,
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
