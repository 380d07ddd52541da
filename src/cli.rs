//! Command-line definition for the `buildreport` binary.

use crate::action::PipePolicy;
use crate::config::ConfigOverrides;
use crate::output::ColorChoice;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "buildreport")]
#[command(
    version,
    about = "Console and mirror-log reporting for build engine actions",
    after_help = "EXAMPLES:
    # Report a finished compile whose output was captured to files
    buildreport report --action Compile --target '<obj>src/main.o' \\
        --command 'cc -c src/main.c' --stdout-file out.txt --stderr-file err.txt

    # Run a command and report it, echoing both streams into build.log too
    buildreport --pipe-action 3 --log-file build.log exec --action Link --target app -- cc -o app main.o

    # Show the effective configuration
    buildreport config"
)]
pub struct Cli {
    /// Captured output echo mask: 0 = stdout (default), 1 = stdout, 2 = stderr, 3 = both
    #[arg(long, global = true, value_parser = parse_pipe_action)]
    pub pipe_action: Option<PipePolicy>,

    /// Print each action's command line
    #[arg(short = 'd', long, global = true)]
    pub debug_exec: bool,

    /// Mirror all console output into this file (appended)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// When to color action banners
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Config file to use instead of ~/.config/buildreport/config.toml
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The flags that override configuration file values.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            pipe_action: self.pipe_action,
            debug_exec: self.debug_exec,
            log_file: self.log_file.clone(),
            color: self.color,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report an action that has already finished
    Report {
        /// Action name for the banner; omit for a quiet action
        #[arg(long)]
        action: Option<String>,

        /// Target identifier, optionally with <grist>
        #[arg(long)]
        target: String,

        /// Command text the action ran
        #[arg(long)]
        command: String,

        /// File holding the action's captured stdout
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        stdout_file: Option<PathBuf>,

        /// File holding the action's captured stderr
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        stderr_file: Option<PathBuf>,

        /// The action exited unsuccessfully
        #[arg(long)]
        failed: bool,
    },

    /// Run a program, capture its output and report it
    Exec {
        /// Action name for the banner; omit for a quiet action
        #[arg(long)]
        action: Option<String>,

        /// Target identifier, optionally with <grist>
        #[arg(long)]
        target: String,

        /// Program and arguments to run
        #[arg(last = true, required = true)]
        program: Vec<String>,
    },

    /// Print the effective configuration
    Config,

    /// Output shell completion script to stdout (hidden utility command)
    #[command(hide = true)]
    Completions {
        /// Shell type to generate completions for (bash, zsh, or fish)
        shell: String,
    },
}

fn parse_pipe_action(value: &str) -> Result<PipePolicy, String> {
    let mask: u8 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number between 0 and 3", value))?;
    PipePolicy::new(mask).map_err(|e| e.to_string())
}
