// src/assess/aggregate.rs
use std::collections::BTreeMap;
use tracing::warn;

use crate::assess::MergedRow;

/// One (status, indicator) group with its births-weighted mean coverage,
/// rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRow {
    pub status: String,
    pub indicator: String,
    pub coverage: f64,
}

#[derive(Default)]
struct GroupAcc {
    weighted_sum: f64,
    weight_sum: f64,
    skipped: usize,
}

/// Group merged rows by (status, indicator) and compute the births-weighted
/// mean of the most recent estimate per group.
///
/// Rows with a missing estimate or missing births weight are excluded from
/// the mean; a group left with no usable pair is omitted from the result.
/// Groups iterate in (status, indicator) order, so the output is stable
/// across runs on unchanged input.
pub fn weighted_coverage(rows: &[MergedRow]) -> Vec<CoverageRow> {
    let mut groups: BTreeMap<(String, String), GroupAcc> = BTreeMap::new();

    for row in rows {
        let acc = groups
            .entry((row.status.clone(), row.indicator.clone()))
            .or_default();
        match (row.most_recent_estimate, row.births_thousands) {
            (Some(value), Some(weight)) => {
                acc.weighted_sum += value * weight;
                acc.weight_sum += weight;
            }
            _ => acc.skipped += 1,
        }
    }

    let mut result = Vec::with_capacity(groups.len());
    for ((status, indicator), acc) in groups {
        if acc.skipped > 0 {
            warn!(
                %status,
                %indicator,
                skipped = acc.skipped,
                "rows with missing estimate or births excluded from weighted mean"
            );
        }
        if acc.weight_sum <= 0.0 {
            warn!(%status, %indicator, "no usable rows; group omitted from result");
            continue;
        }
        result.push(CoverageRow {
            status,
            indicator,
            coverage: round2(acc.weighted_sum / acc.weight_sum),
        });
    }
    result
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
