//! Exec command handler.
//!
//! Runs a program to completion with both streams captured, then reports
//! it like any other action.

use crate::action::{ActionReport, ExitOutcome};
use crate::error::{ReportError, Result};
use crate::output::{print_warning, ActionReporter};
use std::process::{Command, Stdio};

/// Exit code used when the child was killed by a signal.
const SIGNALED_EXIT_CODE: i32 = 1;

/// Render a program and its arguments as one command line.
fn command_text(program: &[String]) -> String {
    program
        .iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program`, report it and return the child's exit code.
///
/// Only a failure to start the program is an error. Problems writing the
/// report are logged and the child's status is still returned.
pub fn exec_command(
    reporter: &ActionReporter,
    action: Option<&str>,
    target: &str,
    program: &[String],
) -> Result<i32> {
    let (name, args) = program
        .split_first()
        .ok_or_else(|| ReportError::Spawn("No program given".to_string()))?;

    tracing::debug!(program = %name, "running action command");
    let output = Command::new(name)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ReportError::Spawn(format!("Failed to spawn {}: {}", name, e)))?;

    let command = command_text(program);
    let report = ActionReport {
        action,
        target,
        command: &command,
        stdout: Some(output.stdout.as_slice()),
        stderr: Some(output.stderr.as_slice()),
        outcome: ExitOutcome::from_success(output.status.success()),
    };
    // The child has already run; a console failure must not replace its status.
    if let Err(err) = reporter.report(&report) {
        tracing::warn!(error = %err, program = %name, "action report incomplete");
    }

    match output.status.code() {
        Some(code) => Ok(code),
        None => {
            print_warning(&format!("'{}' was terminated by a signal", name));
            Ok(SIGNALED_EXIT_CODE)
        }
    }
}
