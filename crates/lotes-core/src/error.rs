//! Error types for the lotes-core library.

use thiserror::Error;

/// Main error type for the lotes library.
#[derive(Error, Debug)]
pub enum LotesError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Reference table error.
    #[error("reference table error: {0}")]
    Reference(#[from] ReferenceError),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised while loading a reference price table.
///
/// These halt reconciliation only; extraction and the other exports are
/// unaffected.
#[derive(Error, Debug)]
pub enum ReferenceError {
    /// A required column is not present in the header row.
    #[error("missing required column '{column}' (expected one of: {}; found: {})", expected.join(", "), found.join(", "))]
    MissingColumn {
        column: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The table has no header row at all.
    #[error("reference table has no header row")]
    NoHeader,

    /// The delimiter setting is not a single ASCII byte.
    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(String),

    /// The reference file is neither a table nor a document.
    #[error("unsupported reference format: {0:?}")]
    UnsupportedFormat(String),

    /// Underlying CSV failure.
    #[error("failed to read reference table: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for the lotes library.
pub type Result<T> = std::result::Result<T, LotesError>;
