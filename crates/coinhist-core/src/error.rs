use std::path::PathBuf;

use thiserror::Error;

use crate::ExportFormat;

/// Validation errors raised while building a request, before any network access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("coin symbol cannot be empty")]
    EmptySymbol,
    #[error("coin symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("coin symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("a coin symbol or a numeric id is required")]
    MissingIdentity,
    #[error("numeric id must be greater than zero")]
    InvalidNumericId,

    #[error("incorrect date format '{value}', should be like: dd-mm-yyyy")]
    InvalidDate { value: String },
    #[error("'start_date' or 'end_date' cannot be empty if 'all_time' flag is false")]
    MissingDate,
    #[error("start_date {start} cannot be greater than end_date {end}")]
    InvertedRange { start: String, end: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("fiat must be a 3-letter ISO code: '{value}'")]
    InvalidFiat { value: String },

    #[error("unsupported export format '{value}', expected one of csv, tsv, json, yaml, xlsx")]
    UnsupportedFormat { value: String },
    #[error("invalid provider '{value}', expected one of web-api, legacy")]
    InvalidProvider { value: String },
}

/// Failures while writing or serializing an exported series.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("xlsx serialization failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("{format} output is binary and can only be written to a file")]
    Binary { format: ExportFormat },
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
