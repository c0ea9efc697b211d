//! Alignment annotation: coordinate ruler, substitution markers and column statistics

use crate::error::{EngineError, EngineResult};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Symbols and spacing used when annotating an alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Character marking an insertion/deletion column
    pub gap_symbol: char,
    /// A ruler label is placed on every column divisible by this
    pub ruler_interval: usize,
    /// Ruler character between labels
    pub ruler_filler: char,
    /// Marker placed under a substitution
    pub marker: char,
    /// Marker row character for every other column
    pub blank: char,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            gap_symbol: '-',
            ruler_interval: 10,
            ruler_filler: '.',
            marker: '^',
            blank: ' ',
        }
    }
}

impl AnnotatorConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.ruler_interval == 0 {
            return Err(EngineError::invalid_config("ruler_interval must be at least 1"));
        }
        if self.marker == self.blank {
            return Err(EngineError::invalid_config(format!(
                "marker and blank are both {:?}",
                self.marker
            )));
        }
        if self.ruler_filler.is_ascii_digit() {
            return Err(EngineError::invalid_config("ruler_filler must not be a digit"));
        }
        Ok(())
    }
}

/// What a single alignment column represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Match,
    Substitution,
    /// Gap on at least one side
    Gap,
}

pub fn classify_column(query: char, reference: char, gap_symbol: char) -> ColumnKind {
    if query == gap_symbol || reference == gap_symbol {
        ColumnKind::Gap
    } else if query == reference {
        ColumnKind::Match
    } else {
        ColumnKind::Substitution
    }
}

/// Visual diff of one alignment.
///
/// `ruler` and `markers` are exactly as long as the alignment so they line up
/// character for character with the sequence rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedAlignment {
    pub ruler: String,
    pub markers: String,
    pub stats: AlignmentStats,
    #[serde(skip)]
    marker: char,
}

impl AnnotatedAlignment {
    /// Columns carrying a substitution marker
    pub fn marker_positions(&self) -> Vec<AlignPos> {
        self.markers
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == self.marker)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Annotate an alignment with the default symbols
pub fn annotate(aligned: &AlignedPair) -> EngineResult<AnnotatedAlignment> {
    annotate_with(aligned, &AnnotatorConfig::default())
}

pub fn annotate_with(aligned: &AlignedPair, config: &AnnotatorConfig) -> EngineResult<AnnotatedAlignment> {
    config.validate()?;

    let query: Vec<char> = aligned.query.chars().collect();
    let reference: Vec<char> = aligned.reference.chars().collect();
    if query.len() != reference.len() {
        return Err(EngineError::UnequalAlignment {
            query_len: query.len(),
            reference_len: reference.len(),
        });
    }

    let alignment_length = query.len();
    let mut markers = String::with_capacity(alignment_length);
    let mut match_count = 0;
    let mut mutation_count = 0;
    let mut gap_count = 0;

    for (&q, &r) in query.iter().zip(reference.iter()) {
        match classify_column(q, r, config.gap_symbol) {
            ColumnKind::Match => {
                match_count += 1;
                markers.push(config.blank);
            }
            ColumnKind::Substitution => {
                mutation_count += 1;
                markers.push(config.marker);
            }
            ColumnKind::Gap => {
                gap_count += 1;
                markers.push(config.blank);
            }
        }
    }

    let match_percentage = if alignment_length == 0 {
        0.0
    } else {
        match_count as f64 / alignment_length as f64 * 100.0
    };

    let stats = AlignmentStats {
        match_percentage,
        match_count,
        mutation_count,
        gap_count,
        alignment_length,
    };
    debug_assert!(stats.is_consistent());

    Ok(AnnotatedAlignment {
        ruler: build_ruler(alignment_length, config),
        markers,
        stats,
        marker: config.marker,
    })
}

/// Build a coordinate ruler `length` columns wide.
///
/// Every `ruler_interval`-th column starts its decimal position label, which
/// occupies as many columns as it has digits. A label running past the end of
/// the alignment is cut at the last column.
pub fn build_ruler(length: usize, config: &AnnotatorConfig) -> String {
    let mut ruler = String::with_capacity(length);
    let mut column = 0;

    while column < length {
        if column % config.ruler_interval == 0 {
            let label = column.to_string();
            let width = label.len().min(length - column);
            ruler.push_str(&label[..width]);
            column += width;
        } else {
            ruler.push(config.ruler_filler);
            column += 1;
        }
    }

    ruler
}

/// Annotate a service-provided block, checking its reported figures.
///
/// The recomputed statistics are authoritative; disagreement with the
/// service's own substitution count is only logged.
pub fn annotate_block(block: &AlignmentBlock, config: &AnnotatorConfig) -> EngineResult<AnnotatedAlignment> {
    let annotated = annotate_with(&block.aligned_pair(), config)?;
    let stats = &annotated.stats;

    if block.mutations != stats.mutation_count {
        log::warn!(
            "Analysis service reported {} substitutions, alignment shows {}",
            block.mutations,
            stats.mutation_count
        );
    }
    if let Some(reported_length) = block.alignment_length {
        if reported_length != stats.alignment_length {
            log::warn!(
                "Analysis service reported alignment length {}, alignment has {} columns",
                reported_length,
                stats.alignment_length
            );
        }
    }

    log::debug!(
        "Annotated {} columns: {}% match, {} substitutions, {} gap columns",
        stats.alignment_length,
        stats.display_match_percentage(),
        stats.mutation_count,
        stats.gap_count
    );

    Ok(annotated)
}
