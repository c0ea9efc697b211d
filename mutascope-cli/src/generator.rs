//! Report generation through an external command
//!
//! The command receives the report payload as JSON on stdin and must write
//! the rendered report to stdout.

use crate::error::{CliError, CliResult};
use chrono::NaiveDate;
use mutascope_core::{EngineError, EngineResult, ReportArtifact, ReportGenerator, ReportPayload};
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

pub struct CommandReportGenerator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandReportGenerator {
    pub fn new(command: &str, args: Vec<String>) -> CliResult<Self> {
        let program = which::which(command)
            .map_err(|e| CliError::external_tool(command.to_string(), e.to_string()))?;
        Ok(Self { program, args })
    }

    fn run(&self, input: Vec<u8>) -> CliResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdout is drained while the payload is still being written
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> io::Result<()> {
                match stdin.write_all(&input) {
                    // A generator may exit without reading its input; its status decides
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        log::debug!("Report generator closed stdin early");
                        Ok(())
                    }
                    result => result,
                }
            })
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| CliError::io("report payload writer panicked"))??;
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CliError::external_tool(
                self.name().to_string(),
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(output.stdout)
    }
}

impl ReportGenerator for CommandReportGenerator {
    fn generate(&self, payload: &ReportPayload) -> EngineResult<ReportArtifact> {
        let json = payload
            .to_json()
            .map_err(|e| EngineError::report_generator(e.to_string()))?;

        log::info!("Running report generator: {}", self.program.display());
        let bytes = self
            .run(json.into_bytes())
            .map_err(|e| EngineError::report_generator(e.to_string()))?;
        log::debug!("Report generator produced {} bytes", bytes.len());

        ReportArtifact::new(bytes)
    }

    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("report generator")
    }
}

/// File name for a report generated on `date`
pub fn report_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.pdf", prefix, date.format("%Y-%m-%d"))
}
