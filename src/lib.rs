//! # iepsheet
//!
//! Turn IEP (Individualized Education Program) PDFs into weekly goal
//! tracking sheets.
//!
//! Each input document is decoded to text, the student's name and
//! competency goals are pulled out with pattern matching, and a report is
//! rendered with one page per competency: the goal statement followed by a
//! Monday-to-Friday checklist for every week of the term.
//!
//! ## Quick Start
//!
//! ```no_run
//! use iepsheet::{run, BatchOptions};
//!
//! fn main() -> iepsheet::Result<()> {
//!     let report = run("inputs", "outputs", BatchOptions::default())?;
//!     for (input, error) in report.failures() {
//!         eprintln!("{}: {}", input.display(), error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Document template
//!
//! Extraction assumes the district IEP layout:
//!
//! - the student's name fills the three lines directly above `Date of birth:`
//! - every goal is written as `GOAL <COMPETENCY IN CAPITALS> <goal text> MEANS ...`
//!
//! Documents that do not follow it fail with a typed [`Error`] rather than
//! producing a report with garbage in it.

pub mod batch;
pub mod calendar;
pub mod decode;
pub mod detect;
pub mod error;
pub mod extract;
pub mod report;

// Re-export commonly used types
pub use batch::{
    process_file, run, Batch, BatchOptions, BatchReport, DocumentOutcome, ProcessedDocument, Term,
    WrittenReport,
};
pub use calendar::{generate_date_ranges, week_ranges, MonthYear, WeekRange};
pub use decode::{LopdfDecoder, PdfDecoder, RawDocumentText};
pub use error::{Error, Result};
pub use extract::{
    extract_goals, extract_goals_with_mode, extract_name, ErrorMode, ExtractOptions, GoalEntry,
    GoalMap, StudentRecord,
};
pub use report::{ChecklistTable, PageGroup, ReportDocument};

use std::path::Path;

/// Extract the raw text of a PDF file, pages separated by newlines.
///
/// # Example
///
/// ```no_run
/// let text = iepsheet::extract_text("student.pdf").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let pages = LopdfDecoder::new().decode(path.as_ref())?;
    Ok(RawDocumentText::from_pages(&pages).as_str().to_string())
}

/// Extract a student record from document text, failing on malformed goals.
///
/// # Example
///
/// ```
/// let text = "Barnes,\n Alice\n\nDate of birth: 2015-01-01\n\
///             GOAL MATH Alice will count to 100. MEANS weekly probes\n";
/// let record = iepsheet::parse_record(text).unwrap();
/// assert_eq!(record.name, "Barnes, Alice");
/// assert_eq!(record.goals.get("Math"), Some("Alice will count to 100."));
/// ```
pub fn parse_record(text: &str) -> Result<StudentRecord> {
    StudentRecord::from_text(text, ExtractOptions::default())
}

/// Build a report for a student over the given term.
pub fn build_report(record: &StudentRecord, term: &Term) -> ReportDocument {
    ReportDocument::build(&term.title, &record.name, &record.goals, &term.weeks())
}
