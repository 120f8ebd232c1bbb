//! Error types for iepsheet.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for iepsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting, rendering, or writing reports.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a version string we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error reported by the PDF library.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The configured input directory does not exist.
    #[error("Input directory does not exist: {}", .0.display())]
    InputDirectoryMissing(PathBuf),

    /// No three-line block precedes a "Date of birth:" marker.
    #[error("Student name not found: no \"Date of birth:\" block in document text")]
    NameNotFound,

    /// A GOAL...MEANS span has no word where the competency title ends.
    #[error("Malformed goal block #{index}: no goal text after competency title in {block:?}")]
    MalformedGoalBlock { index: usize, block: String },

    /// The input could not be decoded into text.
    #[error("Failed to decode {}: {reason}", .path.display())]
    DecodeFailure { path: PathBuf, reason: String },

    /// Decoding did not finish within the configured timeout.
    #[error("Decoding {} timed out after {timeout:?}", .path.display())]
    DecodeTimeout { path: PathBuf, timeout: Duration },

    /// The report could not be composed into PDF bytes.
    #[error("Failed to compose report: {0}")]
    ComposeFailure(String),

    /// A month number outside 1..=12.
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// A year the calendar cannot represent.
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Another document in the same batch already claimed this output name.
    #[error("Output name {name} already written for {}", .first.display())]
    OutputCollision { name: String, first: PathBuf },

    /// Error while laying out report pages.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Short machine-friendly tag for batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::UnknownFormat | Error::UnsupportedVersion(_) => "unknown_format",
            Error::PdfParse(_) | Error::Encrypted => "pdf_parse",
            Error::InputDirectoryMissing(_) => "input_directory_missing",
            Error::NameNotFound => "name_not_found",
            Error::MalformedGoalBlock { .. } => "malformed_goal_block",
            Error::DecodeFailure { .. } => "decode_failure",
            Error::DecodeTimeout { .. } => "decode_timeout",
            Error::ComposeFailure(_) | Error::Render(_) => "compose_failure",
            Error::InvalidMonth(_) | Error::InvalidYear(_) => "invalid_term",
            Error::OutputCollision { .. } => "output_collision",
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
