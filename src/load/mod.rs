// src/load/mod.rs
use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, warn};

/// Marker for the WPP demographic-indicators export, which carries a 16-row
/// metadata banner before the real header.
pub const WPP_BANNER_MARKER: &str = "WPP2022_GEN_F01_DEMOGRAPHIC_INDICATORS_COMPACT_REV1";
const WPP_BANNER_ROWS: usize = 16;

/// A spreadsheet parsed into headers plus string rows.
///
/// Headers come from the first sheet row (after any banner skip); `None`
/// cells are missing values (empty or error cells in the source).
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// True when the table holds neither headers nor rows.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Index of the column with the given header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Load the first worksheet of an xlsx file into a `RawTable`.
///
/// Only `.xlsx` is supported; any other extension yields an empty table
/// rather than an error, so a misconfigured path surfaces downstream as an
/// empty merge. Files named after the WPP demographic-indicators export skip
/// the banner rows before header promotion.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if extension.as_deref() != Some("xlsx") {
        warn!(path = %path.display(), "unsupported file type; yielding empty table");
        return Ok(RawTable::default());
    }

    let skip = if path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.contains(WPP_BANNER_MARKER))
    {
        debug!(path = %path.display(), rows = WPP_BANNER_ROWS, "skipping metadata banner");
        WPP_BANNER_ROWS
    } else {
        0
    };

    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook {} has no worksheets", path.display()))?
        .with_context(|| format!("Failed to read first worksheet of {}", path.display()))?;

    let mut sheet_rows = range.rows().skip(skip);
    let headers: Vec<String> = match sheet_rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default())
            .collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<Option<String>>> = sheet_rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    debug!(path = %path.display(), columns = headers.len(), rows = rows.len(), "table loaded");
    Ok(RawTable { headers, rows })
}

/// Stringify a cell; empty and error cells become `None`.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
