//! Console report for one finished build action.
//!
//! A report is up to three parts, in order:
//!
//! 1. a banner line with the highlighted action name and the short target
//!    name (named actions only),
//! 2. the raw command text when command tracing is on,
//! 3. the action's captured stdout/stderr, filtered by the [`PipePolicy`].
//!
//! Quiet actions that succeed produce no banner and no echoed output; a
//! quiet action that fails still has its captured output shown.

use std::io;
use std::sync::{Mutex, PoisonError};

use crate::action::{ActionReport, PipePolicy};
use crate::config::ReportConfig;
use crate::error::{ReportError, Result};

use super::color::TermColor;
use super::sink::Console;

/// Minimum column width of the action name in a banner line.
pub const ACTION_NAME_WIDTH: usize = 20;

/// Characters that separate path components in target identifiers.
#[cfg(windows)]
pub const PATH_SEPARATORS: &[char] = &['/', '\\'];
#[cfg(not(windows))]
pub const PATH_SEPARATORS: &[char] = &['/'];

/// Short display name of a target, using this platform's separators.
pub fn short_target_name(target: &str) -> &str {
    short_target_name_with(target, PATH_SEPARATORS)
}

/// Short display name of a target.
///
/// Drops a leading `<grist>` and then everything up to the last separator.
/// Falls back to the full identifier if nothing would be left.
pub fn short_target_name_with<'a>(target: &'a str, separators: &[char]) -> &'a str {
    let ungristed = target
        .strip_prefix('<')
        .and_then(|rest| rest.find('>').map(|end| &rest[end + 1..]))
        .unwrap_or(target);

    let short = match ungristed.rfind(separators) {
        Some(pos) => &ungristed[pos + 1..],
        None => ungristed,
    };

    if short.is_empty() {
        target
    } else {
        short
    }
}

/// Reporting switches fixed for the lifetime of a reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSettings {
    pub pipe_policy: PipePolicy,
    /// Echo each action's command text before its output.
    pub debug_exec: bool,
}

impl From<&ReportConfig> for ReportSettings {
    fn from(config: &ReportConfig) -> Self {
        Self {
            pipe_policy: config.pipe_action,
            debug_exec: config.debug_exec,
        }
    }
}

/// Writes action reports to a [`Console`].
///
/// The console sits behind a single lock that is held for a whole report,
/// so reports from different threads never interleave.
pub struct ActionReporter {
    console: Mutex<Console>,
    settings: ReportSettings,
}

impl ActionReporter {
    pub fn new(console: Console, settings: ReportSettings) -> Self {
        Self {
            console: Mutex::new(console),
            settings,
        }
    }

    pub fn settings(&self) -> ReportSettings {
        self.settings
    }

    /// Run `f` with exclusive access to the console.
    pub fn with_console<R>(&self, f: impl FnOnce(&mut Console) -> R) -> R {
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut console)
    }

    pub fn into_console(self) -> Console {
        self.console
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Emit the report for one finished action.
    ///
    /// Every part is attempted even after a failed write; the first I/O
    /// error is returned once the report is complete.
    pub fn report(&self, report: &ActionReport<'_>) -> Result<()> {
        tracing::debug!(
            action = report.action.unwrap_or("quiet"),
            build_target = report.target,
            outcome = ?report.outcome,
            "reporting action"
        );

        let settings = self.settings;
        let first_error = self.with_console(|console| {
            let mut first_error = None;

            if let Some(action) = report.action {
                let short = short_target_name(report.target);
                keep_first(&mut first_error, console.set_color(TermColor::Highlight));
                keep_first(
                    &mut first_error,
                    console.out().write_formatted(format_args!(
                        "{:<width$}",
                        action,
                        width = ACTION_NAME_WIDTH
                    )),
                );
                keep_first(&mut first_error, console.set_color(TermColor::Default));
                keep_first(
                    &mut first_error,
                    console.out().write_formatted(format_args!(" {}\n", short)),
                );
            }

            if settings.debug_exec {
                keep_first(&mut first_error, console.out().write_line(report.command));
            }

            if report.shows_output() {
                if let Some(captured) = non_empty(report.stdout) {
                    if settings.pipe_policy.echoes_stdout() {
                        keep_first(&mut first_error, console.out().write_normalized(captured));
                    }
                }
                if let Some(captured) = non_empty(report.stderr) {
                    if settings.pipe_policy.echoes_stderr() {
                        keep_first(&mut first_error, console.err().write_normalized(captured));
                    }
                }
            }

            first_error
        });

        match first_error {
            Some(err) => Err(ReportError::Io(err)),
            None => Ok(()),
        }
    }
}

fn non_empty(bytes: Option<&[u8]>) -> Option<&[u8]> {
    bytes.filter(|b| !b.is_empty())
}

fn keep_first(slot: &mut Option<io::Error>, result: io::Result<()>) {
    if let Err(err) = result {
        tracing::warn!(error = %err, "console write failed during action report");
        if slot.is_none() {
            *slot = Some(err);
        }
    }
}
