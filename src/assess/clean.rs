// src/assess/clean.rs
use anyhow::{bail, Result};
use tracing::{debug, warn};

use crate::load::RawTable;

/// Fixed column schema of the indicator export after header promotion.
/// The rename is positional; year columns are ordered most-recent-first.
pub const INDICATOR_SCHEMA: [&str; 8] = [
    "Geographic area",
    "Indicator",
    "Sex",
    "2022",
    "2021",
    "2020",
    "2019",
    "2018",
];

/// Sentinel the indicator export uses for missing values.
pub const MISSING_SENTINEL: &str = "-";

/// Normalize a U5MR status label to "On-track"/"Off-track".
///
/// Matching is case-insensitive; unrecognized labels pass through with
/// their original casing.
pub fn normalize_status(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "achieved" | "on track" => "On-track".to_string(),
        "acceleration needed" => "Off-track".to_string(),
        _ => {
            warn!(label = raw, "unrecognized status label; passing through");
            raw.to_string()
        }
    }
}

/// Reshape the raw indicator export: promote its first data row to headers,
/// drop rows missing a geographic area or indicator, and apply the fixed
/// positional schema.
///
/// The export carries no name-based contract; the column count is checked
/// here and a mismatch is an error. An entirely empty input passes through
/// empty and surfaces downstream as an empty merge.
pub fn clean_indicator_table(raw: RawTable) -> Result<RawTable> {
    if raw.is_empty() {
        return Ok(raw);
    }

    let mut rows = raw.rows.into_iter();
    let promoted = match rows.next() {
        Some(row) => row,
        None => bail!("indicator table has no header row to promote"),
    };
    if promoted.len() != INDICATOR_SCHEMA.len() {
        bail!(
            "indicator table schema mismatch: expected {} columns ({}), found {}",
            INDICATOR_SCHEMA.len(),
            INDICATOR_SCHEMA.join(", "),
            promoted.len()
        );
    }

    let mut dropped = 0usize;
    let kept: Vec<Vec<Option<String>>> = rows
        .filter(|row| {
            let complete = row.first().map_or(false, Option::is_some)
                && row.get(1).map_or(false, Option::is_some);
            if !complete {
                dropped += 1;
            }
            complete
        })
        .collect();
    if dropped > 0 {
        debug!(dropped, "dropped indicator rows missing area or indicator");
    }

    Ok(RawTable {
        headers: INDICATOR_SCHEMA.iter().map(|s| s.to_string()).collect(),
        rows: kept,
    })
}

/// Replace the `-` sentinel with a missing marker across the whole table.
/// Runs before any numeric coercion.
pub fn strip_missing_sentinel(table: &mut RawTable) {
    for row in &mut table.rows {
        for cell in row {
            if cell.as_deref() == Some(MISSING_SENTINEL) {
                *cell = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn status_variants_normalize_to_two_labels() {
        assert_eq!(normalize_status("Achieved"), "On-track");
        assert_eq!(normalize_status("On Track"), "On-track");
        assert_eq!(normalize_status("ACCELERATION NEEDED"), "Off-track");
    }

    #[test]
    fn unrecognized_status_passes_through_unchanged() {
        assert_eq!(normalize_status("Stable"), "Stable");
    }

    #[test]
    fn indicator_table_promotes_header_and_drops_incomplete_rows() {
        let raw = RawTable {
            headers: (0..8).map(|i| format!("Unnamed: {i}")).collect(),
            rows: vec![
                cells(&["Geographic area", "Indicator", "Sex", "2022", "2021", "2020", "2019", "2018"]),
                cells(&["Kenya", "ANC4", "Female", "66.1", "-", "57.6", "", ""]),
                cells(&["", "ANC4", "Female", "1", "2", "3", "4", "5"]),
                cells(&["Chad", "", "Female", "1", "2", "3", "4", "5"]),
            ],
        };

        let cleaned = clean_indicator_table(raw).unwrap();
        assert_eq!(cleaned.headers, INDICATOR_SCHEMA);
        assert_eq!(cleaned.rows.len(), 1);
        assert_eq!(cleaned.rows[0][0].as_deref(), Some("Kenya"));
    }

    #[test]
    fn indicator_table_rejects_wrong_column_count() {
        let raw = RawTable {
            headers: vec!["a".into(), "b".into(), "c".into()],
            rows: vec![cells(&["Geographic area", "Indicator", "Sex"])],
        };

        let err = clean_indicator_table(raw).unwrap_err();
        assert!(err.to_string().contains("schema mismatch"));
    }

    #[test]
    fn empty_table_passes_through() {
        let cleaned = clean_indicator_table(RawTable::default()).unwrap();
        assert!(cleaned.is_empty());
    }

    #[test]
    fn sentinel_becomes_missing() {
        let mut table = RawTable {
            headers: vec!["2022".into()],
            rows: vec![cells(&["-"]), cells(&["42.5"])],
        };

        strip_missing_sentinel(&mut table);
        assert_eq!(table.rows[0][0], None);
        assert_eq!(table.rows[1][0].as_deref(), Some("42.5"));
    }
}
