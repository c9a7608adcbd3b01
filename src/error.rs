//! Error types for report queries

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving, loading or querying a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Data directory is missing or cannot be listed
    #[error("cannot read data directory '{path}': {source}")]
    Configuration {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Requested file does not carry a `.csv` extension
    #[error("invalid file name '{0}': only .csv reports are supported")]
    InvalidFormat(String),

    /// Requested file is not part of the catalog
    #[error("report file '{0}' not found")]
    NotFound(String),

    /// No file in the catalog matches the requested report type
    #[error("no {0} report found")]
    NoMatch(String),

    /// Catalog has no eligible files at all
    #[error("no report files found in '{0}'")]
    EmptyCatalog(PathBuf),

    /// Resolved file could not be read
    #[error("{source}")]
    Read {
        file: String,
        source: std::io::Error,
    },

    /// Tool-call arguments could not be read as criteria
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
