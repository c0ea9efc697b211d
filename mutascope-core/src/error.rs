//! Error handling for the Mutascope engine
//!
//! Contract violations are hard failures: the caller handed the engine data it
//! cannot interpret, and no partial result is produced. Data-quality issues the
//! engine can recover from are reported as [`DataQualityWarning`] values next
//! to the result instead.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the engine and its boundary adapters
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Aligned sequences differ in length: query has {query_len} columns, reference has {reference_len}")]
    UnequalAlignment { query_len: usize, reference_len: usize },

    #[error("Malformed mutation record at index {index}: {message}")]
    MalformedRecord { index: usize, message: String },

    #[error("Malformed analysis response: {message}")]
    MalformedResponse { message: String },

    #[error("Invalid annotator configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Report generator returned an empty report")]
    EmptyReport,

    #[error("Report generator failed: {message}")]
    ReportGenerator { message: String },
}

impl EngineError {
    pub fn malformed_record<S: Into<String>>(index: usize, message: S) -> Self {
        Self::MalformedRecord {
            index,
            message: message.into(),
        }
    }

    pub fn malformed_response<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    pub fn report_generator<S: Into<String>>(message: S) -> Self {
        Self::ReportGenerator { message: message.into() }
    }

    /// True when the caller supplied data the engine refuses to interpret.
    ///
    /// The presentation layer must surface these as "unable to render
    /// analysis" rather than as an empty result.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnequalAlignment { .. }
                | Self::MalformedRecord { .. }
                | Self::MalformedResponse { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Recoverable problems found in analysis-service data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Record at `index` of the validated list has no gene and was left out of grouping
    MissingGene { index: usize },
    /// Entry at `index` of the raw mutation list was null
    NullRecord { index: usize },
}

impl DataQualityWarning {
    pub fn index(&self) -> usize {
        match self {
            Self::MissingGene { index } | Self::NullRecord { index } => *index,
        }
    }
}

impl std::fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingGene { index } => {
                write!(f, "mutation record {} has no gene and was dropped from grouping", index)
            }
            Self::NullRecord { index } => write!(f, "mutation list entry {} is null", index),
        }
    }
}
