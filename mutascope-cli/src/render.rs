//! Plain-text rendering of an analysis view

use crate::config::DisplayConfig;
use mutascope_core::analysis::AlignmentView;
use mutascope_core::report::{context_marker, GeneGroup};
use mutascope_core::{AnalysisView, AnnotatedAlignment, FindingsSummary, MutationRecord};

const CONTEXT_LABEL: &str = "    Context:  ";

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Render the full analysis: composition, alignment diff and findings
pub fn render_view(view: &AnalysisView, display: &DisplayConfig) -> String {
    let mut out = String::new();

    if let Some(length) = view.sequence_length {
        push_line(&mut out, &format!("Sequence length: {}", length));
    }
    if let Some(gc) = view.gc_content {
        push_line(&mut out, &format!("GC content: {:.1}%", gc));
    }
    if let Some(warning) = &view.warning {
        push_line(&mut out, &format!("Warning: {}", warning));
    }

    if let Some(alignment) = &view.alignment {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_alignment_view(alignment, display));
    }

    out.push('\n');
    out.push_str(&render_findings(&view.findings.summary, &view.findings.groups));

    if !view.findings.warnings.is_empty() {
        out.push_str("\nData warnings:\n");
        for warning in &view.findings.warnings {
            push_line(&mut out, &format!("  - {}", warning));
        }
    }

    out
}

fn render_alignment_view(alignment: &AlignmentView, display: &DisplayConfig) -> String {
    let mut out = String::new();
    let stats = &alignment.annotated.stats;

    push_line(&mut out, &format!("Alignment ({})", alignment.gene));
    out.push_str(&render_alignment(
        &alignment.query,
        &alignment.reference,
        &alignment.annotated,
        display.label_width,
    ));
    push_line(&mut out, &format!("Match percentage: {}%", stats.display_match_percentage()));
    push_line(&mut out, &format!("Mutations found: {}", stats.mutation_count));
    push_line(&mut out, &format!("Gaps: {}", stats.gap_count));
    push_line(&mut out, alignment.quality.caption());
    out
}

/// The four alignment rows, each behind a fixed-width label
pub fn render_alignment(
    query: &str,
    reference: &str,
    annotated: &AnnotatedAlignment,
    label_width: usize,
) -> String {
    let mut out = String::new();
    let rows = [
        ("Position:", annotated.ruler.as_str()),
        ("Query:", query),
        ("", annotated.markers.as_str()),
        ("Reference:", reference),
    ];
    for (label, row) in rows {
        push_line(&mut out, &format!("{:<width$}{}", label, row, width = label_width));
    }
    out
}

/// Summary counts followed by one section per gene
pub fn render_findings(summary: &FindingsSummary, groups: &[GeneGroup]) -> String {
    let mut out = String::new();

    if summary.total == 0 {
        out.push_str("No mutations found in the analyzed sequence.\n");
        return out;
    }

    push_line(&mut out, &format!("Total Mutations: {}", summary.total));
    push_line(&mut out, &format!("Known Variants: {}", summary.known_variants));
    push_line(&mut out, &format!("Genes Affected: {}", summary.genes_affected));

    for group in groups {
        push_line(
            &mut out,
            &format!(
                "\n{} ({} mutations, {} variants)",
                group.gene, group.summary.total_matches, group.summary.variants
            ),
        );
        for record in &group.mutations {
            out.push_str(&render_record(record));
        }
    }

    out
}

fn render_record(record: &MutationRecord) -> String {
    let mut out = String::new();

    push_line(
        &mut out,
        &format!(
            "  {} {}>{} {}",
            record.rsid_or_unknown(),
            record.reference,
            record.observed,
            record.trait_name
        ),
    );
    match record.alignment_position {
        Some(column) => {
            push_line(&mut out, &format!("    Position: {} (alignment column {})", record.position, column));
        }
        None => {
            push_line(&mut out, &format!("    Position: {}", record.position));
        }
    }
    if !record.effect.is_empty() {
        push_line(&mut out, &format!("    Effect: {}", record.effect));
    }
    if !record.description.is_empty() {
        push_line(&mut out, &format!("    {}", record.description));
    }
    if let (Some(context), Some(marker)) = (record.alignment_context.as_deref(), context_marker(record)) {
        push_line(&mut out, &format!("{}{}", CONTEXT_LABEL, context));
        push_line(&mut out, &format!("{}{}", " ".repeat(CONTEXT_LABEL.len()), marker.trim_end()));
    }

    out
}
