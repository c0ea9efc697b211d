//! Mutation report building: gene grouping, summary counts and the report payload

use crate::error::DataQualityWarning;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Columns shown on each side of a mutation in its alignment context
pub const CONTEXT_FLANK: usize = 5;

/// Running counts for a single gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GeneSummary {
    pub total_matches: usize,
    pub variants: usize,
    /// Variants carrying a registered rsid
    pub known_variants: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneGroup {
    pub gene: String,
    pub summary: GeneSummary,
    pub mutations: Vec<MutationRecord>,
}

impl GeneGroup {
    fn new(gene: String) -> Self {
        Self {
            gene,
            summary: GeneSummary::default(),
            mutations: Vec::new(),
        }
    }

    fn push(&mut self, record: MutationRecord) {
        self.summary.total_matches += 1;
        if record.is_variant {
            self.summary.variants += 1;
            if record.has_known_rsid() {
                self.summary.known_variants += 1;
            }
        }
        self.mutations.push(record);
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Mutations partitioned by gene.
///
/// Genes keep the order in which they first appear in the input and records
/// keep their input order within a gene.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GeneGroups {
    groups: Vec<GeneGroup>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    /// Records left out of every group
    warnings: Vec<DataQualityWarning>,
}

impl GeneGroups {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, gene: &str, record: MutationRecord) {
        let slot = match self.index.get(gene) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.groups.push(GeneGroup::new(gene.to_string()));
                self.index.insert(gene.to_string(), slot);
                slot
            }
        };
        self.groups[slot].push(record);
    }

    pub fn get(&self, gene: &str) -> Option<&GeneGroup> {
        self.index.get(gene).map(|&slot| &self.groups[slot])
    }

    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.gene.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneGroup> {
        self.groups.iter()
    }

    /// Number of distinct genes
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of records placed in a group
    pub fn grouped_count(&self) -> usize {
        self.groups.iter().map(GeneGroup::len).sum()
    }

    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<GeneGroup>, Vec<DataQualityWarning>) {
        (self.groups, self.warnings)
    }
}

impl<'a> IntoIterator for &'a GeneGroups {
    type Item = &'a GeneGroup;
    type IntoIter = std::slice::Iter<'a, GeneGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group mutations by gene.
///
/// Records without a gene are dropped and reported as
/// [`DataQualityWarning::MissingGene`] rather than failing the whole request.
pub fn group_by_gene(mutations: &[MutationRecord]) -> GeneGroups {
    let mut groups = GeneGroups::new();

    for (index, record) in mutations.iter().enumerate() {
        match record.gene_name() {
            Some(gene) => groups.insert(gene, record.clone()),
            None => {
                let warning = DataQualityWarning::MissingGene { index };
                log::warn!("Dropping {}", warning);
                groups.warnings.push(warning);
            }
        }
    }

    groups
}

/// Headline counts for a mutation list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FindingsSummary {
    pub total: usize,
    pub known_variants: usize,
    pub genes_affected: usize,
}

pub fn summarize(mutations: &[MutationRecord]) -> FindingsSummary {
    summarize_grouped(mutations, &group_by_gene(mutations))
}

fn summarize_grouped(mutations: &[MutationRecord], groups: &GeneGroups) -> FindingsSummary {
    let summary = FindingsSummary {
        total: mutations.len(),
        known_variants: mutations.iter().filter(|m| m.has_known_rsid()).count(),
        genes_affected: groups.len(),
    };
    log::debug!(
        "Summarized {} mutations: {} known variants across {} genes",
        summary.total,
        summary.known_variants,
        summary.genes_affected
    );
    summary
}

/// Grouped findings handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct MutationOverview {
    pub summary: FindingsSummary,
    pub groups: Vec<GeneGroup>,
    pub warnings: Vec<DataQualityWarning>,
}

pub fn overview(mutations: &[MutationRecord]) -> MutationOverview {
    let grouped = group_by_gene(mutations);
    let summary = summarize_grouped(mutations, &grouped);
    let (groups, warnings) = grouped.into_parts();
    MutationOverview {
        summary,
        groups,
        warnings,
    }
}

/// Report-facing projection of a [`MutationRecord`].
///
/// Field names and order are what the report generator expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationSummary {
    pub gene: String,
    pub rsid: String,
    pub position: SeqPos,
    pub reference: char,
    pub user_value: char,
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub effect: String,
    pub description: String,
    pub is_variant: bool,
}

impl From<&MutationRecord> for MutationSummary {
    fn from(record: &MutationRecord) -> Self {
        Self {
            gene: record.gene.clone(),
            rsid: record.rsid_or_unknown().to_string(),
            position: record.position,
            reference: record.reference,
            user_value: record.observed,
            trait_name: record.trait_name.clone(),
            effect: record.effect.clone(),
            description: record.description.clone(),
            is_variant: record.is_variant,
        }
    }
}

/// Input document for the external report generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub total_analyzed: usize,
    pub matches_found: usize,
    pub variants_found: usize,
    pub matches: Vec<MutationSummary>,
}

impl ReportPayload {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn build_report_payload(mutations: &[MutationRecord]) -> ReportPayload {
    // total_analyzed mirrors matches_found; the service does not report scanned positions
    ReportPayload {
        total_analyzed: mutations.len(),
        matches_found: mutations.len(),
        variants_found: mutations.iter().filter(|m| m.is_variant).count(),
        matches: mutations.iter().map(MutationSummary::from).collect(),
    }
}

/// Marker line to print under a record's alignment context.
///
/// The context window starts [`CONTEXT_FLANK`] columns before the mutation,
/// or at the alignment start when the mutation is closer to it. The line is
/// blank when the observed base equals the reference.
pub fn context_marker(record: &MutationRecord) -> Option<String> {
    let context = record.alignment_context.as_deref()?;
    let width = context.chars().count();
    if width == 0 {
        return None;
    }

    let offset = record
        .alignment_position
        .map_or(CONTEXT_FLANK, |pos| pos.min(CONTEXT_FLANK))
        .min(width - 1);

    let mut line = " ".repeat(offset);
    line.push(if record.is_substitution() { '^' } else { ' ' });
    Some(line)
}
