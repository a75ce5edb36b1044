//! Work id extraction from tabular input.
//!
//! The input is a CSV (or CSV-formatted `.txt`) file with a header row. The id
//! column is chosen by name, `id` first, then `ids.openalex`; if neither
//! header is present the first column is used. Blank cells are skipped.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::ErrorCode;

/// Header names accepted for the id column, in priority order.
pub const ID_COLUMNS: [&str; 2] = ["id", "ids.openalex"];

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read table: {0}")]
    Unreadable(#[from] csv::Error),

    #[error("input table is empty")]
    Empty,

    #[error("input table has no named column to read work ids from")]
    NoIdColumn,
}

impl InputError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } | Self::Unreadable(_) => ErrorCode::InputUnreadable,
            Self::Empty => ErrorCode::InputEmpty,
            Self::NoIdColumn => ErrorCode::InputNoIdColumn,
        }
    }
}

/// Read work ids from the file at `path`.
///
/// # Errors
///
/// Returns an [`InputError`] if the file cannot be opened or parsed, or has no
/// header row.
pub fn read_work_ids(path: &Path) -> Result<Vec<String>, InputError> {
    let file = std::fs::File::open(path).map_err(|source| InputError::Open {
        path: path.display().to_string(),
        source,
    })?;
    parse_work_ids(file)
}

/// Parse work ids from any CSV reader.
///
/// A header-only table is valid and yields no ids; a table without even a
/// header row is [`InputError::Empty`].
///
/// # Errors
///
/// Returns an [`InputError`] on malformed CSV or a missing header row.
pub fn parse_work_ids<R: Read>(reader: R) -> Result<Vec<String>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(InputError::Empty);
    }
    if headers.iter().all(str::is_empty) {
        return Err(InputError::NoIdColumn);
    }

    let column = id_column(&headers);
    debug!(
        column,
        header = headers.get(column).unwrap_or_default(),
        "selected work id column"
    );

    let mut ids = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(value) = record.get(column).map(str::trim).filter(|v| !v.is_empty()) {
            ids.push(value.to_string());
        }
    }

    Ok(ids)
}

fn id_column(headers: &csv::StringRecord) -> usize {
    ID_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
        .unwrap_or(0)
}
