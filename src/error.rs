//! Centralized error handling for csv-eda.
//!
//! Only two failures are expected to reach a user in normal operation: a
//! path that does not exist or cannot be read, and a CSV file the parser (or
//! the text decoder) rejects. Degenerate
//! tables (no rows, no columns, all-missing columns) yield empty or NaN
//! statistics, never an error.
//!
//! ```
//! use csv_eda::error::EdaError;
//!
//! fn describe(err: &EdaError) -> &'static str {
//!     match err {
//!         EdaError::InvalidPath(_) => "bad parameter",
//!         EdaError::CsvParse(_) => "unreadable csv",
//!         _ => "internal",
//!     }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! `ResultExt` adds `.context()` to any `Result` whose error converts into
//! [`EdaError`]:
//!
//! ```no_run
//! use csv_eda::error::ResultExt as _;
//!
//! fn read_notes() -> csv_eda::error::Result<String> {
//!     std::fs::read_to_string("notes.txt").context("Failed to read notes")
//! }
//! ```

use std::fmt;

/// Main error type for csv-eda operations.
#[derive(Debug)]
pub enum EdaError {
    /// I/O errors while writing report artifacts
    Io(std::io::Error),

    /// File not found or otherwise unusable path
    InvalidPath(String),

    /// The CSV parser rejected the input
    CsvParse(String),

    /// Polars failures outside of CSV parsing
    DataProcessing(String),

    /// Plot rendering failures
    Plot(String),

    /// Invalid option values
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for EdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::CsvParse(msg) => write!(f, "Invalid CSV: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Plot(msg) => write!(f, "Plot rendering error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EdaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EdaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for EdaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for EdaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for EdaError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for csv-eda operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<EdaError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: EdaError = e.into();
            EdaError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: EdaError = e.into();
            EdaError::Other(format!("{}: {}", f(), err))
        })
    }
}
