use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use vitrina_core::fields::{FAMILY, IDENTIFIER};
use vitrina_core::{FieldValue, ItemIdentifier, NormalizedRecord, PageFamily};

use crate::StoreError;

fn csv_error(path: &Path) -> impl FnOnce(csv::Error) -> StoreError + '_ {
    move |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Field columns across `records` in first-seen order.
fn columns_of(records: &[NormalizedRecord]) -> IndexSet<&str> {
    records
        .iter()
        .flat_map(|r| r.fields.keys().map(String::as_str))
        .collect()
}

/// Write `records` to `destination`, creating its parent directory.
///
/// Returns the number of data rows written. An empty slice still produces a
/// file with the two fixed header columns.
///
/// # Errors
///
/// Returns [`StoreError`] if the directory or file can't be created or a row
/// can't be serialized.
pub fn write_table(
    records: &[NormalizedRecord],
    destination: &Path,
) -> Result<usize, StoreError> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let columns = columns_of(records);
    let mut writer = csv::Writer::from_path(destination).map_err(csv_error(destination))?;

    let header = [IDENTIFIER, FAMILY]
        .into_iter()
        .chain(columns.iter().copied());
    writer
        .write_record(header)
        .map_err(csv_error(destination))?;

    for record in records {
        let mut row = Vec::with_capacity(columns.len() + 2);
        row.push(record.identifier.to_string());
        row.push(record.family.label().to_string());
        for column in &columns {
            row.push(record.get(column).map(ToString::to_string).unwrap_or_default());
        }
        writer.write_record(&row).map_err(csv_error(destination))?;
    }

    writer.flush().map_err(|source| StoreError::Io {
        path: destination.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %destination.display(),
        rows = records.len(),
        columns = columns.len(),
        "table written"
    );
    Ok(records.len())
}

/// Cell text back to a typed value: integers first, then finite floats,
/// else text. Empty cells are "no value".
fn infer(cell: &str) -> FieldValue {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return FieldValue::Missing;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => FieldValue::Number(n),
        _ => FieldValue::Text(cell.to_string()),
    }
}

/// Read a table previously written by [`write_table`].
///
/// Values are re-typed by their text, so a text field holding digits comes
/// back as an integer.
///
/// # Errors
///
/// Returns [`StoreError`] if the file can't be parsed, lacks the fixed
/// columns, or names a family label that isn't known.
pub fn read_table(source: &Path) -> Result<Vec<NormalizedRecord>, StoreError> {
    let mut reader = csv::Reader::from_path(source).map_err(csv_error(source))?;
    let headers = reader.headers().map_err(csv_error(source))?.clone();

    let position = |column: &'static str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| StoreError::MissingColumn {
                path: source.to_path_buf(),
                column,
            })
    };
    let identifier_at = position(IDENTIFIER)?;
    let family_at = position(FAMILY)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error(source))?;
        let label = row.get(family_at).unwrap_or_default();
        let family = PageFamily::from_label(label).ok_or_else(|| StoreError::UnknownFamily {
            path: source.to_path_buf(),
            line: row.position().map_or(0, csv::Position::line),
            label: label.to_string(),
        })?;

        let fields: IndexMap<String, FieldValue> = headers
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != identifier_at && *index != family_at)
            .map(|(index, name)| {
                (name.to_string(), infer(row.get(index).unwrap_or_default()))
            })
            .collect();

        records.push(NormalizedRecord {
            identifier: ItemIdentifier::new(row.get(identifier_at).unwrap_or_default()),
            family,
            fields,
        });
    }

    tracing::debug!(path = %source.display(), rows = records.len(), "table read");
    Ok(records)
}
