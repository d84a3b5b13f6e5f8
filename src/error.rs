//! Error types for the Rate Resolution Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading a rate chart,
//! resolving a rate, or pricing a collection.

use thiserror::Error;

/// Errors raised while turning a tabular source into a rate table.
///
/// A load error is fatal to the reload attempt that produced it, never to
/// the running service: the previously published table stays in service.
///
/// Coordinates are 0-based source coordinates, so row 0 is the SNF header
/// row and column 0 holds the FAT labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The source could not be read at all.
    #[error("Failed to read rate chart source '{source_name}': {message}")]
    SourceUnreadable {
        /// Description of the source (usually a path).
        source_name: String,
        /// The underlying I/O or decoding error.
        message: String,
    },

    /// The source contained no rows, not even a header.
    #[error("Rate chart source '{source_name}' is empty")]
    EmptySource {
        /// Description of the source.
        source_name: String,
    },

    /// A label or rate cell did not parse to a non-negative decimal.
    #[error("Invalid cell at row {row}, column {column}: '{raw_value}'")]
    InvalidCell {
        /// The row of the offending cell.
        row: usize,
        /// The column of the offending cell.
        column: usize,
        /// The cell contents as found in the source.
        raw_value: String,
    },

    /// A data row did not have the same width as the header row.
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// The row with the wrong width.
        row: usize,
        /// The header width.
        expected: usize,
        /// The width actually found.
        actual: usize,
    },

    /// The reload was abandoned by its caller before the table was published.
    #[error("Reload of '{source_name}' was cancelled before publishing")]
    Cancelled {
        /// Description of the source.
        source_name: String,
    },
}

/// The main error type for the Rate Resolution Engine.
///
/// # Example
///
/// ```
/// use milk_rate_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The rate chart could not be loaded.
    #[error("Rate chart load failed: {0}")]
    Load(#[from] LoadError),

    /// The caller supplied a measurement or quantity that is not usable.
    #[error("Invalid {field} '{value}': {message}")]
    InvalidInput {
        /// The input field that was rejected.
        field: String,
        /// The rejected value as supplied.
        value: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The published table has no rows or no columns to resolve against.
    #[error("No rate available: rate table has {rows} rows and {columns} columns")]
    RateUnavailable {
        /// Number of FAT rows in the table.
        rows: usize,
        /// Number of SNF columns in the table.
        columns: usize,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
