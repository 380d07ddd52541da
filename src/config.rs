use crate::action::PipePolicy;
use crate::error::{ReportError, Result};
use crate::output::ColorChoice;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "buildreport";

/// The filename for the global configuration file.
const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

// ============================================================================
// Report Configuration
// ============================================================================

/// Process-wide reporting settings.
///
/// Read once at startup and never changed while actions are being reported.
/// Missing fields in a config file fall back to their defaults, so partial
/// files are fine.
///
/// # Example
///
/// ```toml
/// # Which captured streams to echo: 0 = stdout (default), 1 = stdout,
/// # 2 = stderr, 3 = both
/// pipe_action = 3
///
/// # Print each action's command line before its output
/// debug_exec = false
///
/// # Mirror all console output into this file
/// log_file = "build.log"
///
/// # auto | always | never
/// color = "auto"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Captured-output echo mask, see [`PipePolicy`].
    pub pipe_action: PipePolicy,

    /// Echo command text for every action, quiet or not.
    pub debug_exec: bool,

    /// Mirror log file. Opened in append mode by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// When to color action banners.
    pub color: ColorChoice,
}

/// Values given on the command line; each one that is set wins over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub pipe_action: Option<PipePolicy>,
    pub debug_exec: bool,
    pub log_file: Option<PathBuf>,
    pub color: Option<ColorChoice>,
}

impl ReportConfig {
    /// Apply command-line overrides on top of this configuration.
    ///
    /// The merged result is validated again, since a flag can carry a value
    /// the file never had.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(policy) = overrides.pipe_action {
            self.pipe_action = policy;
        }
        if overrides.debug_exec {
            self.debug_exec = true;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
        if let Some(color) = overrides.color {
            self.color = color;
        }
        validate_config(&self).map_err(|e| ReportError::Config(e.to_string()))?;
        Ok(self)
    }
}

// ============================================================================
// Config Validation
// ============================================================================

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `log_file` is set to an empty path.
    EmptyLogFile,

    /// `log_file` points at an existing directory.
    LogFileIsDirectory(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyLogFile => {
                write!(f, "`log_file` is empty. Remove the key or give a file path")
            }
            ConfigError::LogFileIsDirectory(path) => {
                write!(f, "`log_file` {:?} is a directory, not a file", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a configuration for consistency.
///
/// The pipe mask is already range-checked when it is parsed; this covers
/// what serde cannot see.
pub fn validate_config(config: &ReportConfig) -> std::result::Result<(), ConfigError> {
    if let Some(path) = &config.log_file {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyLogFile);
        }
        if path.is_dir() {
            return Err(ConfigError::LogFileIsDirectory(path.clone()));
        }
    }
    Ok(())
}

// ============================================================================
// Config File Management
// ============================================================================

/// Default config file content with explanatory comments.
const DEFAULT_CONFIG_WITH_COMMENTS: &str = r#"# buildreport configuration

# Captured output echo mask
# - 0: echo stdout only (default)
# - 1: echo stdout
# - 2: echo stderr
# - 3: echo stdout and stderr
pipe_action = 0

# Print each action's command line before its output
debug_exec = false

# Mirror everything written to the console into a log file
# log_file = "build.log"

# Banner colors: "auto" (only on a terminal), "always", or "never"
color = "auto"
"#;

/// Get the buildreport config directory path (~/.config/buildreport/).
///
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ReportError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Get the path to the global config file (~/.config/buildreport/config.toml).
pub fn global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(GLOBAL_CONFIG_FILENAME))
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<ReportConfig> {
    let config: ReportConfig = toml::from_str(content)
        .map_err(|e| ReportError::Config(format!("Invalid config: {}", e)))?;
    validate_config(&config).map_err(|e| ReportError::Config(e.to_string()))?;
    Ok(config)
}

/// Load the configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<ReportConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content).map_err(|e| match e {
        ReportError::Config(msg) => {
            ReportError::Config(format!("Failed to load config file at {:?}: {}", path, msg))
        }
        other => other,
    })
}

/// Load the global configuration.
///
/// If the file doesn't exist, it is created with default values and
/// comments explaining each option.
pub fn load_global_config() -> Result<ReportConfig> {
    load_or_create_at(&global_config_path()?)
}

fn load_or_create_at(path: &Path) -> Result<ReportConfig> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG_WITH_COMMENTS)?;
        tracing::info!(path = %path.display(), "created default config");
        return Ok(ReportConfig::default());
    }
    load_config_from(path)
}

/// Render a configuration as TOML.
pub fn config_to_toml(config: &ReportConfig) -> Result<String> {
    toml::to_string(config)
        .map_err(|e| ReportError::Config(format!("Failed to serialize config: {}", e)))
}
