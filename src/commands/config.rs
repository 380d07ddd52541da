//! Config command handler.
//!
//! Displays the configuration the reporter would run with.

use crate::config::{config_to_toml, ReportConfig};
use crate::error::Result;
use crate::output::{BOLD, RESET};
use std::io::IsTerminal;
use std::path::Path;

/// Print the effective configuration as TOML, headed by where it came from.
pub fn config_command(config: &ReportConfig, source: &Path) -> Result<()> {
    let text = config_to_toml(config)?;
    if std::io::stdout().is_terminal() {
        println!("{BOLD}# Effective config{RESET}");
    } else {
        println!("# Effective config");
    }
    println!("# {}", source.display());
    println!();
    print!("{}", text);
    Ok(())
}
