//! CSV persistence for normalized tables.
//!
//! Every file starts with the `identifier` and `family` columns followed by
//! the table's field columns in first-seen order. "No value" cells are
//! written empty and read back as [`vitrina_core::FieldValue::Missing`].

mod paths;
mod table;

pub use paths::DataPaths;
pub use table::{read_table, write_table};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path} line {line}: unknown family label {label:?}")]
    UnknownFamily {
        path: PathBuf,
        line: u64,
        label: String,
    },
}
