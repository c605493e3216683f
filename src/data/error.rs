use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems reading the source table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    // Row numbers count data rows from 1, header excluded.
    #[error("row {row}: zip code '{value}' is not a 5-digit integer")]
    InvalidZip { row: usize, value: String },

    #[error("row {row}: {column} value '{value}' is not a number")]
    InvalidCoordinate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("expected a top-level JSON array of records")]
    NotARecordArray,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

/// An aggregation had nothing to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no data available")]
pub struct NoData;
