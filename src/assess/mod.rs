// src/assess/mod.rs
//
// The assessment pipeline: clean → derive → merge → aggregate → chart.
// Each stage runs exactly once per invocation, strictly in sequence.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::AppConfig;
use crate::load;
use crate::render::chart;

pub mod aggregate;
pub mod clean;
pub mod derive;
pub mod merge;

pub use aggregate::CoverageRow;

/// One country row from the U5MR status table.
#[derive(Debug, Clone)]
pub struct StatusRecord {
    pub iso3: String,
    pub name: String,
    pub status: String,
}

/// One country row from the population prospects table. Births that fail
/// numeric coercion are carried as missing, never as an error.
#[derive(Debug, Clone)]
pub struct PopulationRecord {
    pub iso3: String,
    pub births_thousands: Option<f64>,
}

/// One cleaned indicator row. `years` holds the raw year cells ordered
/// most-recent-first; `most_recent_estimate` is filled by the derive stage.
#[derive(Debug, Clone)]
pub struct IndicatorRecord {
    pub area: String,
    pub indicator: String,
    pub sex: Option<String>,
    pub years: Vec<Option<String>>,
    pub most_recent_estimate: Option<f64>,
}

/// One row of the double inner join of status, population, and indicators.
#[derive(Debug, Clone)]
pub struct MergedRow {
    pub status: String,
    pub iso3: String,
    pub name: String,
    pub births_thousands: Option<f64>,
    pub indicator: String,
    pub most_recent_estimate: Option<f64>,
}

/// Runs the full coverage assessment over the configured input files.
pub struct Assessment {
    config: AppConfig,
}

impl Assessment {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Load, clean, merge, and aggregate the three datasets, then render
    /// the coverage chart to `chart_path`. Returns the aggregate rows for
    /// the report stage.
    pub fn run(&self, chart_path: &Path) -> Result<Vec<CoverageRow>> {
        info!("loading input tables");
        let status_raw = load::load_table(self.config.status_path())?;
        let population_raw = load::load_table(self.config.population_path())?;
        let dataflow_raw = load::load_table(self.config.dataflow_path())?;
        info!(
            status_rows = status_raw.rows.len(),
            population_rows = population_raw.rows.len(),
            dataflow_rows = dataflow_raw.rows.len(),
            "tables loaded"
        );

        let mut dataflow = clean::clean_indicator_table(dataflow_raw)?;
        clean::strip_missing_sentinel(&mut dataflow);

        let mut status = merge::extract_status_records(&status_raw)?;
        for record in &mut status {
            record.status = clean::normalize_status(&record.status);
        }
        let population = merge::extract_population_records(&population_raw)?;
        let mut indicators = merge::extract_indicator_records(&dataflow);
        derive::add_most_recent(&mut indicators);

        let merged = merge::merge(&status, &population, &indicators);
        info!(rows = merged.len(), "datasets merged");

        let coverage = aggregate::weighted_coverage(&merged);
        info!(groups = coverage.len(), "weighted coverage computed");

        chart::render_chart(&coverage, chart_path)?;
        Ok(coverage)
    }
}
