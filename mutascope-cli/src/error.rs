//! Error handling for the Mutascope CLI

use mutascope_core::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Exit status for runtime failures
pub const EXIT_FAILURE: i32 = 1;

/// Exit status when analysis data could not be interpreted
pub const EXIT_UNRENDERABLE: i32 = 2;

/// Main error type for Mutascope CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unable to render analysis: {message}")]
    Unrenderable { message: String },

    #[error("External tool error: {tool} - {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Report error: {message}")]
    Report { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn unrenderable<S: Into<String>>(message: S) -> Self {
        Self::Unrenderable { message: message.into() }
    }

    pub fn external_tool<S: Into<String>>(tool: S, message: S) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn report<S: Into<String>>(message: S) -> Self {
        Self::Report { message: message.into() }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unrenderable { .. } => EXIT_UNRENDERABLE,
            _ => EXIT_FAILURE,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        if err.is_contract_violation() {
            Self::unrenderable(err.to_string())
        } else {
            Self::report(err.to_string())
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::Unrenderable { .. } => {
            message.push_str(
                "\n\nThe analysis data is malformed; this is not the same as finding no mutations.\n\
                 Suggestions:\n\
                 • Re-run the analysis and save the service response again\n\
                 • Check that aligned_seq1 and aligned_seq2 have the same length\n\
                 • Check that every mutation has position, reference, user_value and is_variant",
            );
        }

        CliError::ExternalTool { tool, .. } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Install {}\n\
                 • Ensure {} is in your PATH\n\
                 • Set [report] command in mutascope.toml",
                tool, tool
            ));
        }

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your mutascope.toml configuration file\n\
                 • Use 'mutascope config --example' to generate a sample configuration",
            );
        }

        _ => {}
    }

    message
}

/// Print an error with suggestions and exit with a status matching its kind
pub fn report_and_exit(error: &anyhow::Error) -> ! {
    if let Some(engine) = error.downcast_ref::<EngineError>() {
        if engine.is_contract_violation() {
            let cli_error = CliError::unrenderable(engine.to_string());
            eprintln!("Error: {}", format_error_with_suggestions(&cli_error));
            std::process::exit(cli_error.exit_code());
        }
    }

    if let Some(cli_error) = error.downcast_ref::<CliError>() {
        eprintln!("Error: {}", format_error_with_suggestions(cli_error));
        std::process::exit(cli_error.exit_code());
    }

    eprintln!("Error: {:#}", error);
    std::process::exit(EXIT_FAILURE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CliError::config("test message");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: test message");
    }

    #[test]
    fn test_contract_violation_is_unrenderable() {
        let engine = EngineError::UnequalAlignment {
            query_len: 3,
            reference_len: 2,
        };
        let err: CliError = engine.into();
        assert!(matches!(err, CliError::Unrenderable { .. }));
        assert_eq!(err.exit_code(), EXIT_UNRENDERABLE);
        assert!(err.to_string().starts_with("Unable to render analysis"));
    }

    #[test]
    fn test_generator_failure_is_not_unrenderable() {
        let err: CliError = EngineError::EmptyReport.into();
        assert!(matches!(err, CliError::Report { .. }));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_error_suggestions() {
        let err = CliError::file_not_found(PathBuf::from("response.json"));
        let formatted = format_error_with_suggestions(&err);
        assert!(formatted.contains("Suggestions:"));
        assert!(formatted.contains("Check that the file path is correct"));

        let formatted = format_error_with_suggestions(&CliError::unrenderable("bad"));
        assert!(formatted.contains("not the same as finding no mutations"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(matches!(cli_err, CliError::Io { .. }));
    }
}
