use anyhow::Result;
use covassess::{assess::Assessment, config::AppConfig, render::report};
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG: &str = "config.yaml";
const DEFAULT_REPORT: &str = "report.docx";
const CHART_PATH: &str = "documentation/population_weighted_coverage.png";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) resolve paths ────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let report_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_REPORT.to_string()));
    let chart_path = PathBuf::from(CHART_PATH);

    // ─── 3) run the assessment pipeline ──────────────────────────────
    let config = AppConfig::from_yaml_file(&config_path)?;
    let assessment = Assessment::new(config);
    let coverage = assessment.run(&chart_path)?;

    // ─── 4) assemble the report ──────────────────────────────────────
    report::write_report(&coverage, &chart_path, &report_path)?;

    info!("all done");
    Ok(())
}
