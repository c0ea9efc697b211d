use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Coordinate within the analysed sequence (gaps excluded)
pub type SeqPos = u64;

/// Column within a gapped alignment
pub type AlignPos = usize;

/// Sentinel rsid for a variant with no registered identifier
pub const UNKNOWN_RSID: &str = "unknown";

/// Two rows of a pairwise alignment, query on top.
///
/// Both rows are expected to have the same number of columns; the annotator
/// checks this and refuses mismatched input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub query: String,
    pub reference: String,
}

impl AlignedPair {
    pub fn new<Q: Into<String>, R: Into<String>>(query: Q, reference: R) -> Self {
        Self {
            query: query.into(),
            reference: reference.into(),
        }
    }
}

/// Column statistics for one alignment. Recomputed on every annotation.
///
/// Serializes with an extra `display_match_percentage` field holding the
/// one-decimal value shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlignmentStats {
    /// Share of columns where both rows carry the same base, 0..=100
    pub match_percentage: f64,
    pub match_count: usize,
    /// Substitutions only; columns touching a gap are never counted here
    pub mutation_count: usize,
    /// Columns with a gap on at least one side
    pub gap_count: usize,
    pub alignment_length: usize,
}

impl AlignmentStats {
    /// Match percentage rounded to one decimal, as shown to users
    pub fn display_match_percentage(&self) -> String {
        format!("{:.1}", self.match_percentage)
    }

    /// Every column is exactly one of match, substitution or gap.
    pub fn is_consistent(&self) -> bool {
        self.match_count + self.mutation_count + self.gap_count == self.alignment_length
    }
}

impl Serialize for AlignmentStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AlignmentStats", 6)?;
        state.serialize_field("match_percentage", &self.match_percentage)?;
        state.serialize_field("display_match_percentage", &self.display_match_percentage())?;
        state.serialize_field("match_count", &self.match_count)?;
        state.serialize_field("mutation_count", &self.mutation_count)?;
        state.serialize_field("gap_count", &self.gap_count)?;
        state.serialize_field("alignment_length", &self.alignment_length)?;
        state.end()
    }
}

/// How closely the query matches the reference overall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    Excellent,
    Good,
    Low,
}

impl MatchQuality {
    pub fn caption(&self) -> &'static str {
        match self {
            MatchQuality::Excellent => "Excellent match - sequence closely matches reference",
            MatchQuality::Good => "Good match - some variations present",
            MatchQuality::Low => "Low match - significant variations detected",
        }
    }
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchQuality::Excellent => "excellent",
            MatchQuality::Good => "good",
            MatchQuality::Low => "low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub excellent: f64,
    pub good: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            good: 70.0,
        }
    }
}

impl QualityThresholds {
    pub fn classify(&self, match_percentage: f64) -> MatchQuality {
        if match_percentage >= self.excellent {
            MatchQuality::Excellent
        } else if match_percentage >= self.good {
            MatchQuality::Good
        } else {
            MatchQuality::Low
        }
    }
}

/// One mutation reported by the analysis service.
///
/// `position` is the sequence coordinate and `alignment_position` the column
/// in the gapped alignment; they differ whenever gaps precede the mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Empty when the service could not attribute the mutation to a gene
    #[serde(default, deserialize_with = "null_as_default")]
    pub gene: String,
    #[serde(default)]
    pub rsid: Option<String>,
    pub position: SeqPos,
    pub reference: char,
    #[serde(rename = "user_value")]
    pub observed: char,
    #[serde(rename = "trait", default, deserialize_with = "null_as_default")]
    pub trait_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub effect: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub is_variant: bool,
    #[serde(default)]
    pub alignment_position: Option<AlignPos>,
    #[serde(default)]
    pub alignment_context: Option<String>,
}

impl MutationRecord {
    /// Gene name exactly as reported, or `None` when missing or empty
    pub fn gene_name(&self) -> Option<&str> {
        (!self.gene.is_empty()).then_some(self.gene.as_str())
    }

    /// True when the record carries a registered rsid
    pub fn has_known_rsid(&self) -> bool {
        self.rsid
            .as_deref()
            .is_some_and(|rsid| !rsid.is_empty() && rsid != UNKNOWN_RSID)
    }

    pub fn rsid_or_unknown(&self) -> &str {
        match self.rsid.as_deref() {
            Some(rsid) if !rsid.is_empty() => rsid,
            _ => UNKNOWN_RSID,
        }
    }

    pub fn is_substitution(&self) -> bool {
        self.reference != self.observed
    }
}

/// Per-gene alignment block as returned by the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentBlock {
    #[serde(default)]
    pub score: f64,
    pub aligned_seq1: String,
    pub aligned_seq2: String,
    #[serde(default)]
    pub match_percentage: f64,
    #[serde(default)]
    pub gaps: usize,
    #[serde(default)]
    pub mutations: usize,
    #[serde(default)]
    pub alignment_length: Option<usize>,
}

impl AlignmentBlock {
    /// The user's sequence is `aligned_seq1`, the reference `aligned_seq2`.
    pub fn aligned_pair(&self) -> AlignedPair {
        AlignedPair::new(self.aligned_seq1.clone(), self.aligned_seq2.clone())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_names() {
        let json = r#"{
            "gene": "HBB", "rsid": "rs334", "position": 5227002,
            "reference": "A", "user_value": "T", "trait": "Sickle Cell Trait",
            "effect": "Sickle cell carrier", "description": "Glu6Val",
            "is_variant": true, "alignment_position": 20, "alignment_context": "CTGAGGAGAAG"
        }"#;
        let record: MutationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gene_name(), Some("HBB"));
        assert_eq!(record.observed, 'T');
        assert_eq!(record.trait_name, "Sickle Cell Trait");
        assert_eq!(record.alignment_position, Some(20));
        assert!(record.has_known_rsid());
        assert!(record.is_substitution());
    }

    #[test]
    fn test_record_optional_fields() {
        let json = r#"{"gene": null, "position": 3, "reference": "G", "user_value": "A",
                       "trait": null, "is_variant": false}"#;
        let record: MutationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gene_name(), None);
        assert_eq!(record.rsid_or_unknown(), UNKNOWN_RSID);
        assert!(!record.has_known_rsid());
        assert!(record.trait_name.is_empty());
        assert_eq!(record.alignment_context, None);
    }

    #[test]
    fn test_gene_name_is_not_trimmed() {
        let json = r#"{"gene": " HBB ", "position": 0, "reference": "G", "user_value": "G", "is_variant": false}"#;
        let record: MutationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gene_name(), Some(" HBB "));
        assert!(!record.is_substitution());

        let json = r#"{"gene": "", "position": 0, "reference": "G", "user_value": "G", "is_variant": false}"#;
        let record: MutationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gene_name(), None);
    }

    #[test]
    fn test_multi_char_base_rejected() {
        let json = r#"{"gene": "HBB", "position": 0, "reference": "GA", "user_value": "G", "is_variant": true}"#;
        assert!(serde_json::from_str::<MutationRecord>(json).is_err());
    }

    #[test]
    fn test_unknown_sentinel_is_not_known() {
        let json = r#"{"gene": "TP53", "rsid": "unknown", "position": 0, "reference": "C", "user_value": "T", "is_variant": true}"#;
        let record: MutationRecord = serde_json::from_str(json).unwrap();
        assert!(!record.has_known_rsid());
    }

    #[test]
    fn test_quality_thresholds() {
        let thresholds = QualityThresholds::default();
        assert_eq!(thresholds.classify(100.0), MatchQuality::Excellent);
        assert_eq!(thresholds.classify(90.0), MatchQuality::Excellent);
        assert_eq!(thresholds.classify(89.9), MatchQuality::Good);
        assert_eq!(thresholds.classify(70.0), MatchQuality::Good);
        assert_eq!(thresholds.classify(12.5), MatchQuality::Low);
    }

    #[test]
    fn test_stats_display_rounds_to_one_decimal() {
        let stats = AlignmentStats {
            match_percentage: 200.0 / 3.0,
            match_count: 2,
            mutation_count: 1,
            gap_count: 0,
            alignment_length: 3,
        };
        assert_eq!(stats.display_match_percentage(), "66.7");
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_stats_serialize_display_value() {
        let stats = AlignmentStats {
            match_percentage: 800.0 / 9.0,
            match_count: 8,
            mutation_count: 1,
            gap_count: 0,
            alignment_length: 9,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["display_match_percentage"], "88.9");
        assert_eq!(json["match_count"], 8);
        assert_eq!(json["alignment_length"], 9);
        assert!(json["match_percentage"].as_f64().is_some());
    }
}
