//! View command implementation - render a saved analysis response

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;
use crate::render;

pub fn execute(config: &Config, input: PathBuf, gene: Option<String>, json: bool) -> Result<()> {
    let analysis = super::load_analysis(&input)?;

    if gene.is_none() && analysis.alignments.len() > 1 {
        let genes: Vec<&str> = analysis.alignments.keys().map(String::as_str).collect();
        log::info!("Response has alignments for {}; use --gene to show one", genes.join(", "));
    }

    let view = analysis.view(gene.as_deref(), &config.annotate, &config.display.thresholds())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view, &config.display));
    }

    Ok(())
}
