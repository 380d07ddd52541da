use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pipe action {0}: expected a value between 0 and 3")]
    InvalidPipePolicy(u8),

    #[error("Failed to open mirror log {path:?}: {source}")]
    MirrorOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read captured output {path:?}: {source}")]
    CaptureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Timestamp out of range: {secs}s + {nsecs}ns")]
    TimestampOutOfRange { secs: i64, nsecs: u32 },

    #[error("Failed to run action command: {0}")]
    Spawn(String),

    #[error("Shell completion error: {0}")]
    ShellCompletion(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
