//! Annotate command implementation - ruler, markers and statistics for one aligned pair

use anyhow::Result;
use mutascope_core::{annotate_with, AlignedPair};

use crate::config::Config;
use crate::render;

pub fn execute(config: &Config, query: String, reference: String, json: bool) -> Result<()> {
    log::debug!("Annotating {} query columns against {} reference columns", query.len(), reference.len());

    let pair = AlignedPair::new(query, reference);
    let annotated = annotate_with(&pair, &config.annotate)?;
    let stats = &annotated.stats;

    if json {
        println!("{}", serde_json::to_string_pretty(&annotated)?);
        return Ok(());
    }

    let quality = config.display.thresholds().classify(stats.match_percentage);
    print!(
        "{}",
        render::render_alignment(&pair.query, &pair.reference, &annotated, config.display.label_width)
    );
    println!("Match percentage: {}%", stats.display_match_percentage());
    println!("Mutations found: {}", stats.mutation_count);
    println!("Gaps: {}", stats.gap_count);
    println!("{}", quality.caption());

    Ok(())
}
