// src/assess/merge.rs
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use tracing::warn;

use crate::assess::{IndicatorRecord, MergedRow, PopulationRecord, StatusRecord};
use crate::load::RawTable;

const STATUS_ISO3: &str = "ISO3Code";
const STATUS_NAME: &str = "OfficialName";
const STATUS_LABEL: &str = "Status.U5MR";

const POPULATION_ISO3: &str = "ISO3 Alpha-code";
const POPULATION_BIRTHS: &str = "Births (thousands)";

fn require_column(table: &RawTable, name: &str) -> Result<usize> {
    table.column_index(name).ok_or_else(|| {
        anyhow!(
            "required column {:?} not found; available columns: {}",
            name,
            table.headers.join(", ")
        )
    })
}

fn cell<'a>(row: &'a [Option<String>], index: usize) -> Option<&'a str> {
    row.get(index).and_then(|c| c.as_deref())
}

/// Extract status records by header name. Rows missing any of the three
/// fields cannot survive the joins or the group-by and are skipped.
pub fn extract_status_records(table: &RawTable) -> Result<Vec<StatusRecord>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let iso3 = require_column(table, STATUS_ISO3)?;
    let name = require_column(table, STATUS_NAME)?;
    let label = require_column(table, STATUS_LABEL)?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            Some(StatusRecord {
                iso3: cell(row, iso3)?.to_string(),
                name: cell(row, name)?.to_string(),
                status: cell(row, label)?.to_string(),
            })
        })
        .collect())
}

/// Extract population records by header name. Rows without an ISO3 code
/// (regional aggregates in the WPP export) are skipped; a births cell that
/// fails numeric coercion is kept as missing.
pub fn extract_population_records(table: &RawTable) -> Result<Vec<PopulationRecord>> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    let iso3 = require_column(table, POPULATION_ISO3)?;
    let births = require_column(table, POPULATION_BIRTHS)?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            Some(PopulationRecord {
                iso3: cell(row, iso3)?.to_string(),
                births_thousands: super::derive::coerce_numeric(cell(row, births)),
            })
        })
        .collect())
}

/// Extract indicator records from the cleaned export. Columns are fixed by
/// position: area, indicator, sex, then year cells most-recent-first.
pub fn extract_indicator_records(table: &RawTable) -> Vec<IndicatorRecord> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(IndicatorRecord {
                area: cell(row, 0)?.to_string(),
                indicator: cell(row, 1)?.to_string(),
                sex: cell(row, 2).map(str::to_string),
                years: (3..8).map(|i| cell(row, i).map(str::to_string)).collect(),
                most_recent_estimate: None,
            })
        })
        .collect()
}

/// Inner-join status with population on ISO3 code, then the result with the
/// indicator records on official name vs geographic area.
///
/// Both joins are exact and case-sensitive ("Kenya" does not match "KENYA").
/// Unmatched rows are dropped; the drop counts are logged so join erosion is
/// visible without failing the run.
pub fn merge(
    status: &[StatusRecord],
    population: &[PopulationRecord],
    indicators: &[IndicatorRecord],
) -> Vec<MergedRow> {
    let mut by_iso3: HashMap<&str, Vec<&PopulationRecord>> = HashMap::new();
    for record in population {
        by_iso3.entry(record.iso3.as_str()).or_default().push(record);
    }
    let mut by_area: HashMap<&str, Vec<&IndicatorRecord>> = HashMap::new();
    for record in indicators {
        by_area.entry(record.area.as_str()).or_default().push(record);
    }

    let mut merged = Vec::new();
    let mut unmatched_iso3 = 0usize;
    let mut unmatched_name = 0usize;

    for country in status {
        let populations = match by_iso3.get(country.iso3.as_str()) {
            Some(records) => records,
            None => {
                unmatched_iso3 += 1;
                continue;
            }
        };
        let country_indicators = match by_area.get(country.name.as_str()) {
            Some(records) => records,
            None => {
                unmatched_name += 1;
                continue;
            }
        };
        for pop in populations {
            for indicator in country_indicators {
                merged.push(MergedRow {
                    status: country.status.clone(),
                    iso3: country.iso3.clone(),
                    name: country.name.clone(),
                    births_thousands: pop.births_thousands,
                    indicator: indicator.indicator.clone(),
                    most_recent_estimate: indicator.most_recent_estimate,
                });
            }
        }
    }

    if unmatched_iso3 > 0 {
        warn!(
            dropped = unmatched_iso3,
            "status rows with no population match on ISO3 code"
        );
    }
    if unmatched_name > 0 {
        warn!(
            dropped = unmatched_name,
            "status rows with no indicator match on country name"
        );
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(iso3: &str, name: &str, label: &str) -> StatusRecord {
        StatusRecord {
            iso3: iso3.into(),
            name: name.into(),
            status: label.into(),
        }
    }

    fn population(iso3: &str, births: Option<f64>) -> PopulationRecord {
        PopulationRecord {
            iso3: iso3.into(),
            births_thousands: births,
        }
    }

    fn indicator(area: &str, name: &str, estimate: Option<f64>) -> IndicatorRecord {
        IndicatorRecord {
            area: area.into(),
            indicator: name.into(),
            sex: None,
            years: Vec::new(),
            most_recent_estimate: estimate,
        }
    }

    #[test]
    fn matching_keys_join_across_all_three_tables() {
        let merged = merge(
            &[status("KEN", "Kenya", "On-track")],
            &[population("KEN", Some(1433.0))],
            &[
                indicator("Kenya", "ANC4", Some(66.1)),
                indicator("Kenya", "SAB", Some(70.2)),
            ],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].births_thousands, Some(1433.0));
        assert_eq!(merged[0].indicator, "ANC4");
        assert_eq!(merged[1].most_recent_estimate, Some(70.2));
    }

    #[test]
    fn name_join_is_case_sensitive() {
        let merged = merge(
            &[status("KEN", "Kenya", "On-track")],
            &[population("KEN", Some(1433.0))],
            &[indicator("KENYA", "ANC4", Some(66.1))],
        );

        assert!(merged.is_empty());
    }

    #[test]
    fn unmatched_iso3_drops_the_row() {
        let merged = merge(
            &[status("KEN", "Kenya", "On-track")],
            &[population("TCD", Some(700.0))],
            &[indicator("Kenya", "ANC4", Some(66.1))],
        );

        assert!(merged.is_empty());
    }

    #[test]
    fn status_extraction_requires_named_columns() {
        let table = RawTable {
            headers: vec!["ISO3Code".into(), "OfficialName".into()],
            rows: vec![vec![Some("KEN".into()), Some("Kenya".into())]],
        };

        let err = extract_status_records(&table).unwrap_err();
        assert!(err.to_string().contains("Status.U5MR"));
    }

    #[test]
    fn empty_tables_extract_to_no_records() {
        assert!(extract_status_records(&RawTable::default()).unwrap().is_empty());
        assert!(extract_population_records(&RawTable::default()).unwrap().is_empty());
        assert!(extract_indicator_records(&RawTable::default()).is_empty());
    }

    #[test]
    fn births_coercion_failure_is_missing_not_an_error() {
        let table = RawTable {
            headers: vec!["ISO3 Alpha-code".into(), "Births (thousands)".into()],
            rows: vec![
                vec![Some("KEN".into()), Some("1433.0".into())],
                vec![Some("TCD".into()), Some("no estimate".into())],
            ],
        };

        let records = extract_population_records(&table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].births_thousands, Some(1433.0));
        assert_eq!(records[1].births_thousands, None);
    }
}
