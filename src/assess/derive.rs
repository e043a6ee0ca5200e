// src/assess/derive.rs
use crate::assess::IndicatorRecord;

/// First non-missing cell, scanning most-recent-first.
///
/// The caller supplies cells already ordered by descending year; the first
/// non-missing cell wins even if it later fails numeric coercion.
pub fn most_recent(years: &[Option<String>]) -> Option<&str> {
    years.iter().find_map(|value| value.as_deref())
}

/// Coerce a cell to a number; parse failures become missing.
pub fn coerce_numeric(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
}

/// Fill `most_recent_estimate` for every indicator record.
pub fn add_most_recent(records: &mut [IndicatorRecord]) {
    for record in records {
        record.most_recent_estimate = coerce_numeric(most_recent(&record.years));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn most_recent_takes_first_non_missing() {
        let cells = years(&[None, None, Some("42.5"), Some("10"), None]);
        assert_eq!(most_recent(&cells), Some("42.5"));
    }

    #[test]
    fn all_missing_yields_none() {
        let cells = years(&[None, None, None, None, None]);
        assert_eq!(most_recent(&cells), None);
    }

    #[test]
    fn coercion_parses_or_goes_missing() {
        assert_eq!(coerce_numeric(Some("42.5")), Some(42.5));
        assert_eq!(coerce_numeric(Some(" 7 ")), Some(7.0));
        assert_eq!(coerce_numeric(Some("n/a")), None);
        assert_eq!(coerce_numeric(None), None);
    }

    #[test]
    fn records_gain_the_derived_estimate() {
        let mut records = vec![IndicatorRecord {
            area: "Kenya".into(),
            indicator: "ANC4".into(),
            sex: Some("Female".into()),
            years: years(&[None, Some("66.1"), Some("57.6"), None, None]),
            most_recent_estimate: None,
        }];

        add_most_recent(&mut records);
        assert_eq!(records[0].most_recent_estimate, Some(66.1));
    }

    #[test]
    fn non_numeric_first_value_still_wins() {
        let mut records = vec![IndicatorRecord {
            area: "Kenya".into(),
            indicator: "ANC4".into(),
            sex: None,
            years: years(&[Some("suppressed"), Some("57.6"), None, None, None]),
            most_recent_estimate: None,
        }];

        add_most_recent(&mut records);
        assert_eq!(records[0].most_recent_estimate, None);
    }
}
