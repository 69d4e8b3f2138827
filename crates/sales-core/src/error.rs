use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the UrbanMart sales crates.
#[derive(Error, Debug)]
pub enum SalesError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer rejected the file (bad header, encoding, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks one or more required columns.
    #[error("Missing required columns in {path}: {}", .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// A JSON document (persisted settings) could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A dimension name is not one of the recognised grouping keys.
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the sales crates.
pub type Result<T> = std::result::Result<T, SalesError>;

/// Why a single data row was rejected during load.
///
/// Row errors never abort a load; the offending row is skipped and counted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("missing value for '{0}'")]
    MissingField(&'static str),

    #[error("invalid number '{value}' for '{field}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("quantity must be a positive integer, got {0}")]
    NonPositiveQuantity(i64),

    #[error("unit_price must be non-negative, got {0}")]
    NegativePrice(f64),

    #[error("discount must be within [0, 1], got {0}")]
    DiscountOutOfRange(f64),

    #[error("discount_applied must be non-negative, got {0}")]
    NegativeDiscountAmount(f64),

    #[error("unparseable date '{0}'")]
    InvalidDate(String),

    #[error("unknown channel '{0}'")]
    UnknownChannel(String),

    #[error("unknown customer segment '{0}'")]
    UnknownSegment(String),

    #[error("malformed row: {0}")]
    Malformed(String),
}

impl RowError {
    /// Stable short key used to bucket errors in the data-quality summary.
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::MissingField(_) => "missing_field",
            RowError::InvalidNumber { .. } => "invalid_number",
            RowError::NonPositiveQuantity(_) => "non_positive_quantity",
            RowError::NegativePrice(_) => "negative_price",
            RowError::DiscountOutOfRange(_) | RowError::NegativeDiscountAmount(_) => {
                "invalid_discount"
            }
            RowError::InvalidDate(_) => "invalid_date",
            RowError::UnknownChannel(_) => "unknown_channel",
            RowError::UnknownSegment(_) => "unknown_segment",
            RowError::Malformed(_) => "malformed_row",
        }
    }
}
