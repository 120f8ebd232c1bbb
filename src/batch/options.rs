//! Batch options and the compiled-in term.

use std::time::Duration;

use crate::calendar::{week_ranges, MonthYear, WeekRange};
use crate::error::Result;
use crate::extract::{ErrorMode, ExtractOptions};

/// Report title printed at the top of every page group.
pub const TERM_TITLE: &str = "IEP Data Collection - Term 2";

/// First month of the term (inclusive).
pub const TERM_START: (u32, i32) = (2, 2024);

/// Month the term runs up to (exclusive).
pub const TERM_END: (u32, i32) = (6, 2024);

/// Prefix of every output file name.
pub const OUTPUT_PREFIX: &str = "Report_Term2_";

/// Default limit on decoding a single PDF.
pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(30);

/// An academic term: the title on each report and the weeks it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub title: String,
    pub start: MonthYear,
    pub end: MonthYear,
    pub file_prefix: String,
}

impl Term {
    /// Create a term from raw month/year numbers.
    pub fn new(
        title: impl Into<String>,
        start: (u32, i32),
        end: (u32, i32),
        file_prefix: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            start: MonthYear::new(start.0, start.1)?,
            end: MonthYear::new(end.0, end.1)?,
            file_prefix: file_prefix.into(),
        })
    }

    /// The compiled-in term (February to June 2024).
    pub fn term2_2024() -> Self {
        Self::new(TERM_TITLE, TERM_START, TERM_END, OUTPUT_PREFIX)
            .expect("compiled-in term months are valid")
    }

    /// Week spans covered by the term.
    pub fn weeks(&self) -> Vec<WeekRange> {
        week_ranges(self.start, self.end)
    }
}

impl Default for Term {
    fn default() -> Self {
        Self::term2_2024()
    }
}

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Term title, weeks, and output prefix
    pub term: Term,

    /// How malformed goal blocks are handled
    pub error_mode: ErrorMode,

    /// Limit on decoding one PDF (None = wait forever)
    pub decode_timeout: Option<Duration>,

    /// Whether to prepare documents in parallel
    pub parallel: bool,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the term.
    pub fn with_term(mut self, term: Term) -> Self {
        self.term = term;
        self
    }

    /// Set error mode for goal extraction.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Set or clear the decode timeout.
    pub fn with_decode_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.decode_timeout = timeout;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Extraction options derived from these batch options.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new().with_error_mode(self.error_mode)
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            term: Term::default(),
            error_mode: ErrorMode::Lenient,
            decode_timeout: Some(DEFAULT_DECODE_TIMEOUT),
            parallel: true,
        }
    }
}
