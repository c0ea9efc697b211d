//! Configuration handling for the Mutascope CLI
//!
//! Supports loading configuration from mutascope.toml files.

use anyhow::{Context, Result};
use mutascope_core::{AnnotatorConfig, QualityThresholds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub annotate: AnnotatorConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Match percentage at or above which an alignment counts as excellent
    #[serde(default = "default_excellent")]
    pub excellent: f64,

    /// Match percentage at or above which an alignment counts as good
    #[serde(default = "default_good")]
    pub good: f64,

    /// Width of the row labels in front of the alignment rows
    #[serde(default = "default_label_width")]
    pub label_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// External program that reads a report payload on stdin and writes the report to stdout
    #[serde(default)]
    pub command: Option<String>,

    /// Extra arguments passed to the report command
    #[serde(default)]
    pub args: Vec<String>,

    /// Directory generated reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix for generated reports
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

// Default value functions
fn default_excellent() -> f64 { 90.0 }
fn default_good() -> f64 { 70.0 }
fn default_label_width() -> usize { 11 }
fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_filename_prefix() -> String { "dna-analysis-report".to_string() }

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            good: default_good(),
            label_width: default_label_width(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            output_dir: default_output_dir(),
            filename_prefix: default_filename_prefix(),
        }
    }
}

impl DisplayConfig {
    pub fn thresholds(&self) -> QualityThresholds {
        QualityThresholds {
            excellent: self.excellent,
            good: self.good,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from("mutascope.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: mutascope.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.annotate.validate()?;
        if self.display.good > self.display.excellent {
            anyhow::bail!(
                "display.good ({}) must not exceed display.excellent ({})",
                self.display.good,
                self.display.excellent
            );
        }
        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}
