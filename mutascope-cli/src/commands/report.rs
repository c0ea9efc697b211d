//! Report command implementation - build the report payload and optionally render it

use anyhow::{Context, Result};
use mutascope_core::{build_report_payload, ReportGenerator};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::CliError;
use crate::generator::{report_filename, CommandReportGenerator};

pub fn execute(
    config: &Config,
    input: PathBuf,
    output: Option<PathBuf>,
    generate: bool,
    artifact: Option<PathBuf>,
) -> Result<()> {
    let analysis = super::load_analysis(&input)?;
    let payload = build_report_payload(&analysis.mutations);
    log::info!(
        "Report payload: {} matches, {} variants",
        payload.matches_found,
        payload.variants_found
    );

    let json = payload.to_json_pretty()?;
    match &output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write payload: {}", path.display()))?;
            log::info!("Payload written to: {}", path.display());
        }
        None if !generate => println!("{}", json),
        None => {}
    }

    if !generate {
        return Ok(());
    }

    let command = config
        .report
        .command
        .as_deref()
        .ok_or_else(|| CliError::config("no report command set; add `command` under [report]"))?;
    let generator = CommandReportGenerator::new(command, config.report.args.clone())?;
    let report = generator.generate(&payload).map_err(CliError::from)?;

    let path = artifact.unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        config
            .report
            .output_dir
            .join(report_filename(&config.report.filename_prefix, today))
    });
    std::fs::write(&path, report.as_bytes())
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    log::info!("{} wrote {} bytes to {}", generator.name(), report.len(), path.display());
    println!("{}", path.display());

    Ok(())
}
