//! Command implementations for the Mutascope CLI

pub mod annotate;
pub mod config;
pub mod report;
pub mod view;

use crate::error::CliError;
use anyhow::{Context, Result};
use mutascope_core::Analysis;
use std::path::Path;

/// Read and validate a saved analysis-service response
pub(crate) fn load_analysis(path: &Path) -> Result<Analysis> {
    if !path.exists() {
        return Err(CliError::file_not_found(path.to_path_buf()).into());
    }

    log::info!("Reading analysis response: {}", path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    Ok(Analysis::from_json(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    const RESPONSE: &str = r#"{
        "sequenceLength": 10,
        "mutations": [
            {"gene": "HBB", "rsid": "rs334", "position": 20, "reference": "A", "user_value": "T",
             "trait": "Sickle Cell Trait", "is_variant": true}
        ]
    }"#;

    #[test]
    fn test_missing_input_is_file_not_found() {
        let err = load_analysis(Path::new("does-not-exist.json")).unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::FileNotFound { .. })));
    }

    #[test]
    fn test_malformed_response_is_contract_violation() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"mutations": [{{"gene": "HBB"}}]}}"#)?;
        let err = load_analysis(file.path()).unwrap_err();
        let engine = err.downcast_ref::<mutascope_core::EngineError>();
        assert!(engine.is_some_and(|e| e.is_contract_violation()));
        Ok(())
    }

    #[test]
    fn test_report_writes_payload() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(RESPONSE.as_bytes())?;
        let dir = tempdir()?;
        let output = dir.path().join("payload.json");

        report::execute(&Config::default(), file.path().to_path_buf(), Some(output.clone()), false, None)?;

        let payload: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(payload["total_analyzed"], 1);
        assert_eq!(payload["variants_found"], 1);
        assert_eq!(payload["matches"][0]["user_value"], "T");
        Ok(())
    }

    #[test]
    fn test_generate_without_command_is_config_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(RESPONSE.as_bytes())?;
        let dir = tempdir()?;

        let err = report::execute(
            &Config::default(),
            file.path().to_path_buf(),
            Some(dir.path().join("payload.json")),
            true,
            None,
        )
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::Config { .. })));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_with_command() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(RESPONSE.as_bytes())?;
        let dir = tempdir()?;
        let artifact = dir.path().join("report.pdf");

        let mut config = Config::default();
        config.report.command = Some("cat".to_string());
        report::execute(
            &config,
            file.path().to_path_buf(),
            Some(dir.path().join("payload.json")),
            true,
            Some(artifact.clone()),
        )?;

        let written = std::fs::read_to_string(&artifact)?;
        assert!(written.contains("\"matches_found\":1"));
        Ok(())
    }

    #[test]
    fn test_config_saved_to_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("mutascope.toml");
        config::execute(&Config::default(), true, Some(path.clone()))?;
        let loaded = Config::load(Some(path.as_path()))?;
        assert_eq!(loaded.display.label_width, 11);
        Ok(())
    }
}
