//! Shell completion scripts for the `buildreport` binary.
//!
//! Scripts are generated from the same clap definition the binary parses
//! with, so they never drift from the real flags.

use crate::cli::Cli;
use crate::error::{ReportError, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Shells accepted by `buildreport completions <shell>`.
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "fish"];

/// Supported shell types for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Parse a shell name as given on the command line.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            _ => Err(ReportError::ShellCompletion(format!(
                "Unsupported shell: '{}'",
                name
            ))),
        }
    }

    /// Convert to the `clap_complete::Shell` type.
    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Generate the completion script for `shell`.
pub fn generate_completion_script(shell: ShellType) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), &mut cmd, "buildreport", &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Write the completion script for `shell` to stdout.
pub fn print_completion_script(shell: ShellType) -> Result<()> {
    let script = generate_completion_script(shell);
    let mut stdout = std::io::stdout();
    stdout.write_all(script.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
