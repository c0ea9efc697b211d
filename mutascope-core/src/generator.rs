//! Boundary with the external report generator

use crate::error::{EngineError, EngineResult};
use crate::report::ReportPayload;

/// Rendered report bytes, guaranteed non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    bytes: Vec<u8>,
}

impl ReportArtifact {
    /// Wrap generator output. The content itself is never inspected.
    pub fn new(bytes: Vec<u8>) -> EngineResult<Self> {
        if bytes.is_empty() {
            return Err(EngineError::EmptyReport);
        }
        Ok(Self { bytes })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Something that turns a report payload into a rendered document
pub trait ReportGenerator {
    fn generate(&self, payload: &ReportPayload) -> EngineResult<ReportArtifact>;
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_report_payload;

    struct EchoGenerator;

    impl ReportGenerator for EchoGenerator {
        fn generate(&self, payload: &ReportPayload) -> EngineResult<ReportArtifact> {
            let json = payload
                .to_json()
                .map_err(|e| EngineError::report_generator(e.to_string()))?;
            ReportArtifact::new(json.into_bytes())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_empty_artifact_rejected() {
        assert!(matches!(ReportArtifact::new(Vec::new()), Err(EngineError::EmptyReport)));
    }

    #[test]
    fn test_generator_roundtrip() {
        let payload = build_report_payload(&[]);
        let artifact = EchoGenerator.generate(&payload).unwrap();
        assert_eq!(
            artifact.as_bytes(),
            br#"{"total_analyzed":0,"matches_found":0,"variants_found":0,"matches":[]}"#
        );
        assert_eq!(EchoGenerator.name(), "echo");
    }
}
