//! Console output for build action reports.
//!
//! - [`sink`] - stdout/stderr writers duplicated into the mirror log
//! - [`color`] - highlight/default color switching
//! - [`reporter`] - per-action banner, command trace and output echo
//! - [`messages`] - CLI error and warning lines

pub mod color;
pub mod messages;
pub mod reporter;
pub mod sink;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
}

pub use colors::*;

pub use color::{
    platform_backend, AnsiBackend, ColorBackend, ColorChoice, ColorController, TermColor,
};
pub use messages::{print_error, print_warning};
pub use reporter::{
    short_target_name, short_target_name_with, ActionReporter, ReportSettings,
    ACTION_NAME_WIDTH, PATH_SEPARATORS,
};
pub use sink::{strip_carriage_returns, BoxedWriter, Console, DualSink, Stream};
