//! CLI command handlers for buildreport.
//!
//! # Commands
//!
//! - [`report`] - Report an action whose output is already captured
//! - [`exec`] - Run a program and report it
//! - [`config`] - Show the effective configuration

mod config;
mod exec;
mod report;

pub use config::config_command;
pub use exec::exec_command;
pub use report::{report_command, ReportArgs};

use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::output::{ActionReporter, Console, ReportSettings};
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

/// Open the mirror log for appending, creating it if needed.
pub fn open_mirror_log(path: &Path) -> Result<BufWriter<std::fs::File>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ReportError::MirrorOpen {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(BufWriter::new(file))
}

/// Build a reporter over the real console as described by `config`.
pub fn build_reporter(config: &ReportConfig) -> Result<ActionReporter> {
    let mut console = Console::stdio(config.color);
    if let Some(path) = &config.log_file {
        console = console.with_mirror(Box::new(open_mirror_log(path)?));
        tracing::debug!(path = %path.display(), "mirroring console output");
    }
    Ok(ActionReporter::new(console, ReportSettings::from(config)))
}

/// Flush both console streams and the mirror.
pub fn finish(reporter: &ActionReporter) -> Result<()> {
    reporter.with_console(|console| {
        let out = console.flush_out();
        let err = console.flush_err();
        out.and(err)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_open_mirror_log_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("build.log");
        std::fs::write(&path, "earlier\n").unwrap();

        let mut mirror = open_mirror_log(&path).unwrap();
        mirror.write_all(b"later\n").unwrap();
        mirror.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "earlier\nlater\n");
    }

    #[test]
    fn test_open_mirror_log_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("build.log");

        let err = open_mirror_log(&path).unwrap_err();
        assert!(matches!(err, ReportError::MirrorOpen { .. }));
        assert!(err.to_string().contains("build.log"));
    }

    #[test]
    fn test_build_reporter_uses_config_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config = ReportConfig {
            pipe_action: crate::action::PipePolicy::new(3).unwrap(),
            debug_exec: true,
            log_file: Some(temp_dir.path().join("mirror.log")),
            color: crate::output::ColorChoice::Never,
        };

        let reporter = build_reporter(&config).unwrap();
        assert_eq!(reporter.settings().pipe_policy.bits(), 3);
        assert!(reporter.settings().debug_exec);
        reporter.with_console(|console| {
            assert!(console.has_mirror());
            assert!(!console.color_enabled());
        });
        assert!(temp_dir.path().join("mirror.log").exists());
    }
}
