// src/render/chart.rs
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::{fs, path::Path};
use tracing::info;

use crate::assess::CoverageRow;

/// Qualitative palette cycled over the indicator count, one color per
/// indicator series.
const PALETTE: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 700;

/// Render the grouped coverage bar chart to a PNG at `out_path`,
/// creating parent directories as needed. Status categories sit on the
/// x-axis with one bar per indicator inside each group.
pub fn render_chart(rows: &[CoverageRow], out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create chart directory {}", parent.display()))?;
        }
    }

    // Rows arrive sorted by (status, indicator), so first-seen order is
    // already deterministic.
    let mut statuses: Vec<&str> = Vec::new();
    let mut indicators: Vec<&str> = Vec::new();
    for row in rows {
        if !statuses.contains(&row.status.as_str()) {
            statuses.push(row.status.as_str());
        }
        if !indicators.contains(&row.indicator.as_str()) {
            indicators.push(row.indicator.as_str());
        }
    }

    let top = rows.iter().map(|r| r.coverage).fold(0.0_f64, f64::max);
    let y_max = if top > 0.0 { top * 1.1 } else { 100.0 };
    let x_max = statuses.len().max(1) as f64 - 0.5;

    let root = BitMapBackend::new(out_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Population Weighted Coverage by U5MR Status and Indicator",
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5_f64..x_max, 0.0_f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(statuses.len().max(1))
        .x_label_formatter(&|x| {
            let nearest = x.round();
            if (x - nearest).abs() > 0.01 || nearest < 0.0 {
                return String::new();
            }
            statuses
                .get(nearest as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .x_desc("U5MR Status")
        .y_desc("Coverage (Population Weighted)")
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 14))
        .draw()?;

    let group_width = 0.8_f64;
    let bar_width = group_width / indicators.len().max(1) as f64;

    for (series_idx, indicator) in indicators.iter().enumerate() {
        let color = PALETTE[series_idx % PALETTE.len()];
        let bars = rows
            .iter()
            .filter(|r| r.indicator == *indicator)
            .filter_map(|r| {
                let group = statuses.iter().position(|s| *s == r.status)? as f64;
                let x0 = group - group_width / 2.0 + series_idx as f64 * bar_width;
                Some(Rectangle::new(
                    [(x0, 0.0), (x0 + bar_width, r.coverage)],
                    color.filled(),
                ))
            });

        chart
            .draw_series(bars)?
            .label(indicator.to_string())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    if !indicators.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()
        .with_context(|| format!("Failed to write chart to {}", out_path.display()))?;
    info!(path = %out_path.display(), "chart rendered");
    Ok(())
}
