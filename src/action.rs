//! Data describing one finished build action.
//!
//! An [`ActionReport`] borrows everything it carries from the caller and
//! lives only for the duration of a single
//! [`ActionReporter::report`](crate::output::ActionReporter::report) call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReportError, Result};

/// How the action's process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitOutcome {
    #[default]
    Ok,
    Failed,
}

impl ExitOutcome {
    /// Map a process exit success flag to an outcome.
    pub fn from_success(success: bool) -> Self {
        if success {
            ExitOutcome::Ok
        } else {
            ExitOutcome::Failed
        }
    }

    pub fn is_failed(self) -> bool {
        self == ExitOutcome::Failed
    }
}

/// Which captured streams get echoed after an action finishes.
///
/// Bit 0 allows stdout, bit 1 allows stderr. The value `0` is treated as
/// the unset default and still echoes stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PipePolicy(u8);

impl PipePolicy {
    pub const STDOUT: u8 = 1;
    pub const STDERR: u8 = 2;

    /// Build a policy from a raw mask, rejecting anything outside `0..=3`.
    pub fn new(mask: u8) -> Result<Self> {
        if mask > (Self::STDOUT | Self::STDERR) {
            return Err(ReportError::InvalidPipePolicy(mask));
        }
        Ok(Self(mask))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn echoes_stdout(self) -> bool {
        self.0 & Self::STDOUT != 0 || self.0 == 0
    }

    pub fn echoes_stderr(self) -> bool {
        self.0 & Self::STDERR != 0
    }
}

impl TryFrom<u8> for PipePolicy {
    type Error = ReportError;

    fn try_from(mask: u8) -> Result<Self> {
        Self::new(mask)
    }
}

impl From<PipePolicy> for u8 {
    fn from(policy: PipePolicy) -> u8 {
        policy.0
    }
}

impl fmt::Display for PipePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed action, as handed to the reporter.
///
/// An action without a name is *quiet*: its banner is suppressed and its
/// captured output is only shown if it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionReport<'a> {
    pub action: Option<&'a str>,
    pub target: &'a str,
    pub command: &'a str,
    /// Captured output, as raw bytes in whatever encoding the tool used.
    pub stdout: Option<&'a [u8]>,
    pub stderr: Option<&'a [u8]>,
    pub outcome: ExitOutcome,
}

impl<'a> ActionReport<'a> {
    /// Start a quiet, successful report with no captured output.
    pub fn new(target: &'a str, command: &'a str) -> Self {
        Self {
            action: None,
            target,
            command,
            stdout: None,
            stderr: None,
            outcome: ExitOutcome::Ok,
        }
    }

    pub fn named(mut self, action: &'a str) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_stdout(mut self, bytes: &'a [u8]) -> Self {
        self.stdout = Some(bytes);
        self
    }

    pub fn with_stderr(mut self, bytes: &'a [u8]) -> Self {
        self.stderr = Some(bytes);
        self
    }

    pub fn with_outcome(mut self, outcome: ExitOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn is_quiet(&self) -> bool {
        self.action.is_none()
    }

    /// Whether captured output may be echoed at all.
    ///
    /// Named actions always qualify; a quiet action only when it failed.
    pub fn shows_output(&self) -> bool {
        !self.is_quiet() || self.outcome.is_failed()
    }
}
