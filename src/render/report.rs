// src/render/report.rs
use anyhow::{Context, Result};
use docx_rs::{Docx, Paragraph, Pic, Run, Table, TableCell, TableRow};
use std::{fs, fs::File, path::Path};
use tracing::info;

use crate::assess::CoverageRow;

/// Sentence rendered instead of the results table when the aggregate is
/// empty.
pub const RESULTS_PLACEHOLDER: &str = "No data available to display in the results table.";

// Embedded chart width: 6 in at 914400 EMU/in, height keeps the 1200x700
// chart aspect.
const IMAGE_WIDTH_EMU: u32 = 5_486_400;
const IMAGE_HEIGHT_EMU: u32 = 3_200_400;

const TITLE: &str = "Consultancy Assessment Report";

const METHODOLOGY_INTRO: &str = "The consultancy assessment was conducted through a structured data pipeline \
designed to process, clean, merge, analyze, and visualize global health indicators, specifically related to \
Under-5 Mortality Rate (U5MR) status and population data. Below is a breakdown of the methodology followed, \
along with key assumptions and caveats:";

/// Fixed narrative: (label, body) pairs, none of it derived from data.
const METHODOLOGY: [(&str, &str); 5] = [
    (
        "Data Loading:",
        "Three key datasets were used: the U5MR status classification (on-track/off-track), world population \
prospects including birth projections, and global indicator estimates from the global data flow. These files \
are expected to follow specific structural conventions, which are implicitly assumed during parsing.",
    ),
    (
        "Data Cleaning:",
        "U5MR status labels were standardized (e.g., 'achieved', 'on track') and grouped under unified labels \
('On-track' or 'Off-track'). The global data flow required reformatting due to inconsistent headers and \
missing data entries. Rows with incomplete 'Geographic area' or 'Indicator' values were removed. Yearly data \
columns (e.g., 2022, 2021, etc.) were converted to numeric, treating '-' as missing.",
    ),
    (
        "Assumptions Made:",
        "The most recent available estimate across years (2022-2018) is a valid proxy for current coverage. \
Population weight was based solely on the number of projected births, assuming it's a valid proxy for health \
service need. Country matching across datasets was assumed to be reliable using ISO3 codes and country names \
(e.g., 'ISO3Code' vs. 'OfficialName').",
    ),
    (
        "Merging Datasets:",
        "Datasets were merged on country codes and names. Any mismatch or missing alignment (e.g., differing \
spellings) may lead to data loss.",
    ),
    (
        "Analysis and Visualization:",
        "A population-weighted average coverage was computed for each combination of U5MR status and \
indicator, visualized as a bar chart with color-coded indicators and status categories.",
    ),
];

const CLOSING: &str = "The data indicates a clear improvement in maternal healthcare coverage from the \
off-track to on-track status. Specifically, the percentage of women receiving at least four antenatal care \
visits increased from 56.52% to 75.92%, while the proportion of deliveries attended by skilled health \
personnel rose from 69.38% to 92.72%. These improvements suggest significant progress in access to and \
utilization of essential maternal health services, which are critical for reducing maternal and newborn \
mortality rates.";

const IDENTIFICATION: &str =
    "Position I applied for: Household Survey Data Analyst Consultant - Req. #581656";

fn heading(text: &str, half_points: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(half_points))
}

fn body(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn labeled(label: &str, text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(label).bold())
        .add_run(Run::new().add_text(" "))
        .add_run(Run::new().add_text(text))
}

/// The results table as text cells, header row first. One row per
/// (status, indicator) group, every column rendered.
pub fn results_table_cells(rows: &[CoverageRow]) -> Vec<Vec<String>> {
    let mut cells = vec![vec![
        "Status.U5MR".to_string(),
        "Indicator".to_string(),
        "PopulationWeightedCoverage".to_string(),
    ]];
    for row in rows {
        cells.push(vec![
            row.status.clone(),
            row.indicator.clone(),
            format!("{:.2}", row.coverage),
        ]);
    }
    cells
}

fn build_docx(rows: &[CoverageRow], image: &[u8]) -> Docx {
    let mut doc = Docx::new()
        .add_paragraph(heading(TITLE, 48))
        .add_paragraph(heading("Methodology and Assumptions", 32))
        .add_paragraph(body(METHODOLOGY_INTRO));
    for (label, text) in METHODOLOGY {
        doc = doc.add_paragraph(labeled(label, text));
    }

    let chart = Pic::new(image).size(IMAGE_WIDTH_EMU, IMAGE_HEIGHT_EMU);
    doc = doc
        .add_paragraph(Paragraph::new().add_run(Run::new().add_image(chart)))
        .add_paragraph(heading("Results Table", 32));

    if rows.is_empty() {
        doc = doc.add_paragraph(body(RESULTS_PLACEHOLDER));
    } else {
        let table_rows = results_table_cells(rows)
            .into_iter()
            .map(|row| {
                TableRow::new(
                    row.into_iter()
                        .map(|text| TableCell::new().add_paragraph(body(&text)))
                        .collect(),
                )
            })
            .collect();
        doc = doc.add_table(Table::new(table_rows));
    }

    doc.add_paragraph(body(CLOSING))
        .add_paragraph(body(IDENTIFICATION))
}

/// Assemble the DOCX report around the aggregate rows and the rendered
/// chart at `image_path`, save it to `out_path`, and print a confirmation.
pub fn write_report(rows: &[CoverageRow], image_path: &Path, out_path: &Path) -> Result<()> {
    let image = fs::read(image_path)
        .with_context(|| format!("Failed to read chart image {}", image_path.display()))?;

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
        }
    }
    let file = File::create(out_path)
        .with_context(|| format!("Failed to create report file {}", out_path.display()))?;
    build_docx(rows, &image)
        .build()
        .pack(file)
        .with_context(|| format!("Failed to write report to {}", out_path.display()))?;

    info!(path = %out_path.display(), "report assembled");
    println!("DOCX report saved to {}", out_path.display());
    Ok(())
}
