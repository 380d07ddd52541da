//! Basic message output functions.
//!
//! Used by the CLI for its own diagnostics. These bypass the mirror log:
//! they describe the reporter, not the build.

use std::io::{self, IsTerminal};

use super::colors::*;

fn styled(text: &str, style: &str, terminal: bool) -> String {
    if terminal {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    let label = styled("Error:", &format!("{RED}{BOLD}"), io::stderr().is_terminal());
    eprintln!("{} {}", label, msg);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: &str) {
    let label = styled("Warning:", YELLOW, io::stderr().is_terminal());
    eprintln!("{} {}", label, msg);
}
