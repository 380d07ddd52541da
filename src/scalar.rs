//! Canonical string forms for numbers and timestamps.
//!
//! Results are interned in a [`SymbolTable`], so formatting the same value
//! twice hands back the same shared allocation.

use chrono::DateTime;
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ReportError, Result};

/// An interned string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both symbols point at the same interned allocation.
    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    strings: HashSet<Arc<str>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        if let Some(existing) = self.strings.get(text) {
            return Symbol(Arc::clone(existing));
        }
        let interned: Arc<str> = Arc::from(text);
        self.strings.insert(Arc::clone(&interned));
        Symbol(interned)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// A file or clock time: whole seconds since the Unix epoch plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    pub secs: i64,
    pub nsecs: u32,
}

impl Timestamp {
    pub fn new(secs: i64, nsecs: u32) -> Self {
        Self { secs, nsecs }
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::new(after.as_secs() as i64, after.subsec_nanos()),
            Err(err) => {
                let before = err.duration();
                if before.subsec_nanos() == 0 {
                    Self::new(-(before.as_secs() as i64), 0)
                } else {
                    Self::new(
                        -(before.as_secs() as i64) - 1,
                        1_000_000_000 - before.subsec_nanos(),
                    )
                }
            }
        }
    }
}

/// Renders timestamps as text.
pub trait TimestampFormat {
    fn format(&self, time: &Timestamp) -> Result<String>;
}

/// `YYYY-MM-DD HH:MM:SS.NNNNNNNNN +0000`, always in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct UtcTimestampFormat;

impl TimestampFormat for UtcTimestampFormat {
    fn format(&self, time: &Timestamp) -> Result<String> {
        let utc = DateTime::from_timestamp(time.secs, time.nsecs).ok_or(
            ReportError::TimestampOutOfRange {
                secs: time.secs,
                nsecs: time.nsecs,
            },
        )?;
        Ok(utc.format("%Y-%m-%d %H:%M:%S%.9f +0000").to_string())
    }
}

/// Decimal form of an integer.
pub fn format_int(value: i64) -> String {
    value.to_string()
}

/// Fixed notation with six fractional digits, the way C's `%f` prints.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        if value.is_sign_negative() {
            "-nan".to_string()
        } else {
            "nan".to_string()
        }
    } else if value.is_infinite() {
        if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else {
        format!("{:.6}", value)
    }
}

/// Formats scalars and interns the results.
#[derive(Debug, Default)]
pub struct ScalarFormatter<F = UtcTimestampFormat> {
    symbols: SymbolTable,
    timestamps: F,
}

impl ScalarFormatter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: TimestampFormat> ScalarFormatter<F> {
    pub fn with_timestamp_format(timestamps: F) -> Self {
        Self {
            symbols: SymbolTable::new(),
            timestamps,
        }
    }

    pub fn int(&mut self, value: i64) -> Symbol {
        self.symbols.intern(&format_int(value))
    }

    pub fn double(&mut self, value: f64) -> Symbol {
        self.symbols.intern(&format_double(value))
    }

    pub fn time(&mut self, time: &Timestamp) -> Result<Symbol> {
        let text = self.timestamps.format(time)?;
        Ok(self.symbols.intern(&text))
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}
