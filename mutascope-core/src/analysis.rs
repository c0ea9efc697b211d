//! Analysis-service responses
//!
//! The external analysis service returns sequence composition, a mutation
//! list and per-gene alignment blocks. This module turns that document into
//! validated engine inputs and assembles the view the presentation layer
//! renders.

use crate::alignment::{annotate_block, AnnotatedAlignment, AnnotatorConfig};
use crate::error::{DataQualityWarning, EngineError, EngineResult};
use crate::report::{overview, MutationOverview};
use crate::types::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "sequenceLength", alias = "sequence_length", default)]
    sequence_length: Option<u64>,
    #[serde(rename = "gcContent", alias = "gc_content", default)]
    gc_content: Option<f64>,
    #[serde(default)]
    mutations: Option<Vec<Value>>,
    #[serde(default)]
    matches: Option<Vec<Value>>,
    #[serde(default)]
    alignment_statistics: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    warning: Option<String>,
}

/// A validated analysis-service response
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub sequence_length: Option<u64>,
    /// GC content of the submitted sequence, in percent
    pub gc_content: Option<f64>,
    pub mutations: Vec<MutationRecord>,
    /// Alignment blocks keyed by gene
    pub alignments: BTreeMap<String, AlignmentBlock>,
    /// Free-text warning from the service, e.g. low similarity to the reference
    pub warning: Option<String>,
    pub data_warnings: Vec<DataQualityWarning>,
}

impl Analysis {
    pub fn from_json(text: &str) -> EngineResult<Self> {
        let raw: RawResponse = serde_json::from_str(text)
            .map_err(|e| EngineError::malformed_response(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_value(value: Value) -> EngineResult<Self> {
        let raw: RawResponse = serde_json::from_value(value)
            .map_err(|e| EngineError::malformed_response(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawResponse) -> EngineResult<Self> {
        let entries = raw.mutations.or(raw.matches).unwrap_or_default();
        let (mutations, data_warnings) = validate_records(&entries)?;

        let mut alignments = BTreeMap::new();
        for (gene, block) in raw.alignment_statistics.unwrap_or_default() {
            // An empty object stands for a gene without an alignment
            if block.as_object().is_some_and(|fields| fields.is_empty()) {
                log::debug!("Skipping empty alignment block for {}", gene);
                continue;
            }
            let block: AlignmentBlock = serde_json::from_value(block).map_err(|e| {
                EngineError::malformed_response(format!("alignment block for {}: {}", gene, e))
            })?;
            alignments.insert(gene, block);
        }

        log::info!(
            "Loaded analysis: {} mutations, {} alignment blocks",
            mutations.len(),
            alignments.len()
        );

        Ok(Self {
            sequence_length: raw.sequence_length,
            gc_content: raw.gc_content,
            mutations,
            alignments,
            warning: raw.warning,
            data_warnings,
        })
    }

    /// Alignment block for `gene`, or the only block when no gene is given
    pub fn alignment_for(&self, gene: Option<&str>) -> Option<(&str, &AlignmentBlock)> {
        match gene {
            Some(gene) => self
                .alignments
                .get_key_value(gene)
                .map(|(name, block)| (name.as_str(), block)),
            None if self.alignments.len() == 1 => self
                .alignments
                .iter()
                .next()
                .map(|(name, block)| (name.as_str(), block)),
            None => None,
        }
    }

    /// Everything the presentation layer needs for one analysis
    pub fn view(
        &self,
        gene: Option<&str>,
        config: &AnnotatorConfig,
        thresholds: &QualityThresholds,
    ) -> EngineResult<AnalysisView> {
        let alignment = match self.alignment_for(gene) {
            Some((name, block)) => {
                let annotated = annotate_block(block, config)?;
                let quality = thresholds.classify(annotated.stats.match_percentage);
                Some(AlignmentView {
                    gene: name.to_string(),
                    query: block.aligned_seq1.clone(),
                    reference: block.aligned_seq2.clone(),
                    annotated,
                    quality,
                })
            }
            None => {
                if let Some(gene) = gene {
                    log::warn!("No alignment block for gene {}", gene);
                }
                None
            }
        };

        let mut findings = overview(&self.mutations);
        findings.warnings.extend(self.data_warnings.iter().copied());

        Ok(AnalysisView {
            sequence_length: self.sequence_length,
            gc_content: self.gc_content,
            warning: self.warning.clone(),
            alignment,
            findings,
        })
    }
}

/// Validate raw mutation list entries.
///
/// Null entries are skipped with a [`DataQualityWarning::NullRecord`]; any
/// other entry that is not a well-formed record is a contract violation.
pub fn validate_records(entries: &[Value]) -> EngineResult<(Vec<MutationRecord>, Vec<DataQualityWarning>)> {
    let mut records = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        if entry.is_null() {
            let warning = DataQualityWarning::NullRecord { index };
            log::warn!("Skipping {}", warning);
            warnings.push(warning);
            continue;
        }
        let record = MutationRecord::deserialize(entry)
            .map_err(|e| EngineError::malformed_record(index, e.to_string()))?;
        records.push(record);
    }

    Ok((records, warnings))
}

#[derive(Debug, Clone, Serialize)]
pub struct AlignmentView {
    pub gene: String,
    pub query: String,
    pub reference: String,
    #[serde(flatten)]
    pub annotated: AnnotatedAlignment,
    pub quality: MatchQuality,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub sequence_length: Option<u64>,
    pub gc_content: Option<f64>,
    pub warning: Option<String>,
    pub alignment: Option<AlignmentView>,
    pub findings: MutationOverview,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "sequenceLength": 9,
            "gcContent": 55.6,
            "mutations": [
                {"gene": "HBB", "rsid": "rs334", "position": 20, "reference": "A", "user_value": "T",
                 "trait": "Sickle Cell Trait", "effect": "Carrier", "description": "Glu6Val",
                 "is_variant": true, "alignment_position": 3, "alignment_context": "ATGATGCA"},
                null
            ],
            "alignment_statistics": {
                "HBB": {"score": 7, "aligned_seq1": "ATGATGCAC", "aligned_seq2": "ATGGTGCAC",
                        "match_percentage": 88.9, "gaps": 0, "mutations": 1}
            }
        })
    }

    #[test]
    fn test_parse_response() {
        let analysis = Analysis::from_value(response()).unwrap();
        assert_eq!(analysis.sequence_length, Some(9));
        assert_eq!(analysis.mutations.len(), 1);
        assert_eq!(analysis.data_warnings, vec![DataQualityWarning::NullRecord { index: 1 }]);
        assert!(analysis.alignments.contains_key("HBB"));
    }

    #[test]
    fn test_matches_fallback() {
        let value = json!({
            "matches": [{"gene": "HBB", "position": 1, "reference": "G", "user_value": "A", "is_variant": true}]
        });
        let analysis = Analysis::from_value(value).unwrap();
        assert_eq!(analysis.mutations.len(), 1);
        assert!(analysis.alignments.is_empty());
        assert_eq!(analysis.sequence_length, None);
    }

    #[test]
    fn test_malformed_record_is_contract_violation() {
        let value = json!({"mutations": [{"gene": "HBB", "reference": "G", "user_value": "A", "is_variant": true}]});
        let err = Analysis::from_value(value).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { index: 0, .. }));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_malformed_document() {
        let err = Analysis::from_json(r#"{"mutations": 5}"#).unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse { .. }));
    }

    #[test]
    fn test_empty_alignment_block_skipped() {
        let value = json!({"mutations": [], "alignment_statistics": {"HBB": {}}});
        let analysis = Analysis::from_value(value).unwrap();
        assert!(analysis.alignments.is_empty());
    }

    #[test]
    fn test_alignment_selection() {
        let analysis = Analysis::from_value(response()).unwrap();
        assert_eq!(analysis.alignment_for(None).map(|(gene, _)| gene), Some("HBB"));
        assert_eq!(analysis.alignment_for(Some("HBB")).map(|(gene, _)| gene), Some("HBB"));
        assert!(analysis.alignment_for(Some("TP53")).is_none());
    }

    #[test]
    fn test_view() {
        let analysis = Analysis::from_value(response()).unwrap();
        let view = analysis
            .view(Some("HBB"), &AnnotatorConfig::default(), &QualityThresholds::default())
            .unwrap();
        let alignment = view.alignment.unwrap();
        assert_eq!(alignment.annotated.markers, "   ^     ");
        assert_eq!(alignment.annotated.stats.mutation_count, 1);
        assert_eq!(alignment.quality, MatchQuality::Good);
        assert_eq!(view.findings.summary.genes_affected, 1);
        assert_eq!(view.findings.warnings.len(), 1);
    }

    #[test]
    fn test_view_rejects_unequal_block() {
        let value = json!({
            "mutations": [],
            "alignment_statistics": {"HBB": {"aligned_seq1": "ATG", "aligned_seq2": "ATGG"}}
        });
        let analysis = Analysis::from_value(value).unwrap();
        let err = analysis
            .view(None, &AnnotatorConfig::default(), &QualityThresholds::default())
            .unwrap_err();
        assert!(err.is_contract_violation());
    }
}
