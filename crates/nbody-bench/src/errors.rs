use polars::error::PolarsError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, aggregating or reporting benchmark results
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Failed to parse configuration: {0}")]
    ConfigError(String),

    #[error("Invalid label pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Malformed benchmark file {path}: {reason}")]
    MalformedFile { path: PathBuf, reason: String },

    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("DataFrame error: {0}")]
    DataFrameError(String),

    #[error("Column '{0}' not found in measurement table")]
    MissingColumn(String),

    #[error("Column '{column}' has no value in row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Measurement tables are misaligned: {0}")]
    MisalignedTables(String),

    #[error("Expected {expected} device tables, got {actual}")]
    DeviceCount { expected: usize, actual: usize },

    #[error("Cannot render an empty series: {0}")]
    EmptySeries(String),

    #[error("No benchmark series matches '{0}'")]
    MissingSeries(String),

    #[error("Benchmark series '{0}' already exists")]
    DuplicateSeries(String),

    #[error("Failed to render output: {0}")]
    RenderError(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type for benchmark operations
pub type BenchResult<T> = Result<T, BenchError>;

/// Utility functions for working with BenchError
pub mod util {
    use super::*;
    use std::path::Path;

    /// Check if a file exists, returning a FileNotFound error if it doesn't
    pub fn ensure_file_exists<P: AsRef<Path>>(path: P) -> BenchResult<()> {
        let path_ref = path.as_ref();
        if !path_ref.is_file() {
            return Err(BenchError::FileNotFound(path_ref.to_path_buf()));
        }
        Ok(())
    }
}

impl From<PolarsError> for BenchError {
    fn from(err: PolarsError) -> Self {
        BenchError::DataFrameError(err.to_string())
    }
}

impl From<fmt::Error> for BenchError {
    fn from(err: fmt::Error) -> Self {
        BenchError::RenderError(err.to_string())
    }
}

impl From<toml::de::Error> for BenchError {
    fn from(err: toml::de::Error) -> Self {
        BenchError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for BenchError {
    fn from(err: toml::ser::Error) -> Self {
        BenchError::ConfigError(err.to_string())
    }
}
