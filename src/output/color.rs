//! Two-state console coloring for action banners.
//!
//! A [`ColorBackend`] knows how to put the terminal into a given
//! [`TermColor`]; exactly one backend is compiled in per platform (see
//! [`platform_backend`]). The [`ColorController`] wraps it with the
//! flush-first rule and the once-decided terminal gate.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use super::colors::{RESET, YELLOW};
use super::sink::DualSink;

/// Foreground color states used by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermColor {
    /// Terminal default foreground.
    Default,
    /// Yellow, used for action names.
    Highlight,
}

impl TermColor {
    pub const DEFAULT_CODE: i32 = 0;
    pub const HIGHLIGHT_CODE: i32 = 33;

    /// Map a raw color code; unrecognized codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            Self::DEFAULT_CODE => Some(TermColor::Default),
            Self::HIGHLIGHT_CODE => Some(TermColor::Highlight),
            _ => None,
        }
    }

    /// The SGR escape sequence for this color.
    pub fn ansi_code(self) -> &'static str {
        match self {
            TermColor::Default => RESET,
            TermColor::Highlight => YELLOW,
        }
    }
}

/// When to emit color transitions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color only when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn resolve(self, stdout_is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => stdout_is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorChoice::Auto => "auto",
            ColorChoice::Always => "always",
            ColorChoice::Never => "never",
        }
    }
}

/// Applies a color transition to the console.
pub trait ColorBackend: Send {
    /// Switch to `color`. `primary` is the already-flushed stdout stream.
    fn apply(&self, primary: &mut dyn Write, color: TermColor) -> io::Result<()>;
}

/// Emits SGR escape sequences into the stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnsiBackend;

impl ColorBackend for AnsiBackend {
    fn apply(&self, primary: &mut dyn Write, color: TermColor) -> io::Result<()> {
        primary.write_all(color.ansi_code().as_bytes())
    }
}

/// Sets the Windows console text attributes directly.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAttributeBackend;

#[cfg(windows)]
impl ColorBackend for ConsoleAttributeBackend {
    fn apply(&self, _primary: &mut dyn Write, color: TermColor) -> io::Result<()> {
        use windows::Win32::System::Console::{
            GetStdHandle, SetConsoleTextAttribute, FOREGROUND_BLUE, FOREGROUND_GREEN,
            FOREGROUND_INTENSITY, FOREGROUND_RED, STD_OUTPUT_HANDLE,
        };

        let attributes = match color {
            TermColor::Default => FOREGROUND_BLUE | FOREGROUND_GREEN | FOREGROUND_RED,
            TermColor::Highlight => FOREGROUND_INTENSITY | FOREGROUND_GREEN | FOREGROUND_RED,
        };

        // SAFETY: both calls only take the process's own stdout handle.
        unsafe {
            let handle = GetStdHandle(STD_OUTPUT_HANDLE).map_err(io::Error::other)?;
            SetConsoleTextAttribute(handle, attributes).map_err(io::Error::other)
        }
    }
}

/// The backend for the platform this binary was built for.
pub fn platform_backend() -> Box<dyn ColorBackend> {
    #[cfg(windows)]
    {
        Box::new(ConsoleAttributeBackend)
    }
    #[cfg(not(windows))]
    {
        Box::new(AnsiBackend)
    }
}

/// Gatekeeper for color transitions on stdout.
pub struct ColorController {
    backend: Box<dyn ColorBackend>,
    enabled: bool,
}

impl ColorController {
    pub fn new(backend: Box<dyn ColorBackend>, enabled: bool) -> Self {
        Self { backend, enabled }
    }

    pub fn ansi(enabled: bool) -> Self {
        Self::new(Box::new(AnsiBackend), enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flush everything pending on `sink`, then switch to `color`.
    ///
    /// The flush happens even when coloring is disabled so that callers see
    /// the same stream boundaries either way.
    pub fn set_color(&self, sink: &mut DualSink<'_>, color: TermColor) -> io::Result<()> {
        let flushed = sink.flush();
        if !self.enabled {
            return flushed;
        }
        let applied = self.backend.apply(sink.primary(), color);
        flushed.and(applied)
    }
}
