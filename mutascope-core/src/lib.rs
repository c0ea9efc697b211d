//! Mutascope Core Library
//!
//! Turns an analysis-service response (aligned sequences plus detected
//! mutations) into a coordinate-ruled visual diff, gene-grouped findings and
//! the payload for an external report generator. Every operation is a pure
//! function of its inputs.

pub mod types;
pub mod error;
pub mod alignment;
pub mod report;
pub mod analysis;
pub mod generator;

// Re-export commonly used types and functions
pub use types::{AlignedPair, AlignmentBlock, AlignmentStats, MatchQuality, MutationRecord, QualityThresholds};
pub use error::{DataQualityWarning, EngineError, EngineResult};
pub use alignment::{annotate, annotate_with, AnnotatedAlignment, AnnotatorConfig};
pub use report::{
    build_report_payload, group_by_gene, summarize, FindingsSummary, GeneGroup, GeneGroups,
    MutationOverview, MutationSummary, ReportPayload,
};
pub use analysis::{Analysis, AnalysisView};
pub use generator::{ReportArtifact, ReportGenerator};

/// Version information for the Mutascope core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
