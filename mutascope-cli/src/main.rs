use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod error;
mod generator;
mod render;

use config::Config;
use error::CliError;

#[derive(Parser)]
#[command(name = "mutascope")]
#[command(about = "Mutascope - DNA mutation analysis viewer")]
#[command(version)]
#[command(long_about = "
Mutascope renders DNA analysis results: a coordinate-ruled alignment diff with
substitution markers, match statistics and mutations grouped by gene. It also
builds the payload for an external report generator.

Examples:
  mutascope annotate --query ACGTACGTAC --reference ACCTACGTAC
  mutascope view response.json --gene HBB
  mutascope report response.json --output payload.json
  mutascope report response.json --generate
  mutascope config --example
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate a single aligned pair with a ruler, markers and statistics
    Annotate {
        /// Aligned query row (gaps as '-')
        #[arg(long, required = true)]
        query: String,

        /// Aligned reference row, same length as the query
        #[arg(long, required = true)]
        reference: String,

        /// Print the annotation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a saved analysis-service response
    View {
        /// Response JSON file
        input: PathBuf,

        /// Gene whose alignment block is shown
        #[arg(long)]
        gene: Option<String>,

        /// Print the view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the report payload and optionally render the report
    Report {
        /// Response JSON file
        input: PathBuf,

        /// Write the payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run the configured report command on the payload
        #[arg(long)]
        generate: bool,

        /// Path of the generated report (defaults to a dated name in [report] output_dir)
        #[arg(long, requires = "generate")]
        artifact: Option<PathBuf>,
    },

    /// Show the effective configuration or an example mutascope.toml
    Config {
        /// Print the default configuration instead of the loaded one
        #[arg(long)]
        example: bool,

        /// Save the configuration to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())
        .map_err(|e| CliError::config(format!("{:#}", e)))?;

    match cli.command {
        Commands::Annotate { query, reference, json } => {
            commands::annotate::execute(&config, query, reference, json)?;
        }

        Commands::View { input, gene, json } => {
            commands::view::execute(&config, input, gene, json)?;
        }

        Commands::Report {
            input,
            output,
            generate,
            artifact,
        } => {
            commands::report::execute(&config, input, output, generate, artifact)?;
        }

        Commands::Config { example, output } => {
            commands::config::execute(&config, example, output)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        error::report_and_exit(&err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_view() {
        let cli = Cli::parse_from(["mutascope", "view", "response.json", "--gene", "HBB", "-v"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::View { input, gene, json } => {
                assert_eq!(input, PathBuf::from("response.json"));
                assert_eq!(gene.as_deref(), Some("HBB"));
                assert!(!json);
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_artifact_requires_generate() {
        let result = Cli::try_parse_from(["mutascope", "report", "r.json", "--artifact", "out.pdf"]);
        assert!(result.is_err());
    }
}
