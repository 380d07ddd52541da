//! buildreport CLI entry point.
//!
//! Parses command-line arguments, resolves the configuration and dispatches
//! to the appropriate command handler.

use buildreport::cli::{Cli, Commands};
use buildreport::commands::{
    build_reporter, config_command, exec_command, finish, report_command, ReportArgs,
};
use buildreport::completion::{print_completion_script, ShellType, SUPPORTED_SHELLS};
use buildreport::config::{global_config_path, load_config_from, load_global_config};
use buildreport::output::print_error;
use buildreport::{ReportConfig, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the diagnostic log filter.
const LOG_ENV: &str = "BUILDREPORT_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<(ReportConfig, PathBuf)> {
    let (config, source) = match &cli.config {
        Some(path) => (load_config_from(path)?, path.clone()),
        None => (load_global_config()?, global_config_path()?),
    };
    Ok((config.with_overrides(cli.overrides())?, source))
}

/// Run the parsed command and return the process exit code.
fn run(cli: Cli) -> Result<i32> {
    if let Commands::Completions { shell } = &cli.command {
        return match ShellType::from_name(shell) {
            Ok(shell_type) => print_completion_script(shell_type).map(|_| 0),
            Err(e) => {
                print_error(&format!(
                    "{}\nSupported shells: {}",
                    e,
                    SUPPORTED_SHELLS.join(", ")
                ));
                Ok(1)
            }
        };
    }

    let (config, source) = resolve_config(&cli)?;

    if let Commands::Config = cli.command {
        config_command(&config, &source)?;
        return Ok(0);
    }

    let reporter = build_reporter(&config)?;
    let code = match cli.command {
        Commands::Report {
            action,
            target,
            command,
            stdout_file,
            stderr_file,
            failed,
        } => {
            let args = ReportArgs {
                action,
                target,
                command,
                stdout_file,
                stderr_file,
                failed,
            };
            report_command(&reporter, &args).map(|_| 0)
        }
        Commands::Exec {
            action,
            target,
            program,
        } => exec_command(&reporter, action.as_deref(), &target, &program),
        Commands::Config | Commands::Completions { .. } => Ok(0),
    };

    // The mirror is buffered; flush before any early exit.
    let flushed = finish(&reporter);
    let code = code?;
    flushed?;
    Ok(code)
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
