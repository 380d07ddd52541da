//! Report command handler.
//!
//! Reports an action that ran elsewhere and left its captured output in files.

use crate::action::{ActionReport, ExitOutcome};
use crate::error::{ReportError, Result};
use crate::output::ActionReporter;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments of `buildreport report`.
#[derive(Debug, Clone, Default)]
pub struct ReportArgs {
    pub action: Option<String>,
    pub target: String,
    pub command: String,
    pub stdout_file: Option<PathBuf>,
    pub stderr_file: Option<PathBuf>,
    pub failed: bool,
}

/// Read captured output as raw bytes; no encoding is assumed.
fn read_capture(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| ReportError::CaptureRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Report a finished action.
pub fn report_command(reporter: &ActionReporter, args: &ReportArgs) -> Result<()> {
    let stdout = args.stdout_file.as_deref().map(read_capture).transpose()?;
    let stderr = args.stderr_file.as_deref().map(read_capture).transpose()?;

    let report = ActionReport {
        action: args.action.as_deref(),
        target: &args.target,
        command: &args.command,
        stdout: stdout.as_deref(),
        stderr: stderr.as_deref(),
        outcome: ExitOutcome::from_success(!args.failed),
    };
    reporter.report(&report)
}
