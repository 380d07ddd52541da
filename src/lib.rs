pub mod action;
pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod output;
pub mod scalar;

#[cfg(test)]
pub(crate) mod test_utils;

pub use action::{ActionReport, ExitOutcome, PipePolicy};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use output::{ActionReporter, Console, DualSink, ReportSettings};
pub use scalar::{ScalarFormatter, Symbol, Timestamp};
