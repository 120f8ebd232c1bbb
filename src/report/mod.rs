//! Weekly tracking-sheet reports.
//!
//! A report holds one page group per competency. Each group repeats the term
//! title and student name, states the competency and goal, and ends with a
//! blank Monday-to-Friday checklist covering every week of the term.
//!
//! # Example
//!
//! ```no_run
//! use iepsheet::calendar::{week_ranges, MonthYear};
//! use iepsheet::extract::GoalMap;
//! use iepsheet::report::ReportDocument;
//!
//! let mut goals = GoalMap::new();
//! goals.insert("Math".to_string(), "Count to 100.".to_string());
//! let weeks = week_ranges(MonthYear::new(2, 2024)?, MonthYear::new(6, 2024)?);
//!
//! let report = ReportDocument::build("IEP Data Collection - Term 2", "Alice", &goals, &weeks);
//! std::fs::write("report.pdf", report.to_pdf()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod layout;
mod metrics;
mod pdf;
mod style;

pub use layout::{column_widths, layout, DrawOp, Flowable, LaidOutPage};
pub use metrics::{text_width, wrap_text};
pub use pdf::{encode_win_ansi, write_pdf};
pub use style::{Alignment, Color, FontFace, PageGeometry, ParagraphStyle, TableStyle};

use crate::calendar::WeekRange;
use crate::error::Result;
use crate::extract::GoalMap;

/// Column headings of the checklist table.
pub const CHECKLIST_HEADER: [&str; 6] = [
    "Week of",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
];

/// Placeholder printed in every day cell.
pub const CHECK_MARK: &str = "Y | N";

/// Blank weekly checklist: one row per week, five day cells each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ChecklistTable {
    /// Build a table with a row for each week.
    pub fn new(weeks: &[WeekRange]) -> Self {
        let rows = weeks
            .iter()
            .map(|week| {
                let mut row = Vec::with_capacity(CHECKLIST_HEADER.len());
                row.push(week.label());
                row.extend(std::iter::repeat(CHECK_MARK.to_string()).take(5));
                row
            })
            .collect();

        Self {
            header: CHECKLIST_HEADER.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    /// Number of week rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// The pages rendered for one competency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    pub title: String,
    pub student_name: String,
    pub competency: String,
    pub goal: String,
    pub table: ChecklistTable,
}

impl PageGroup {
    /// Content of this group in reading order, without the trailing page break.
    pub fn flowables(&self) -> Vec<Flowable> {
        vec![
            paragraph(&self.title, ParagraphStyle::TITLE),
            Flowable::Spacer(12.0),
            paragraph(&format!("Name: {}", self.student_name), ParagraphStyle::NORMAL),
            Flowable::Spacer(12.0),
            paragraph("Competency:", ParagraphStyle::HEADING1),
            Flowable::Spacer(6.0),
            paragraph(&self.competency, ParagraphStyle::NORMAL),
            Flowable::Spacer(12.0),
            paragraph("Goal:", ParagraphStyle::HEADING2),
            Flowable::Spacer(6.0),
            paragraph(&self.goal, ParagraphStyle::NORMAL),
            Flowable::Spacer(12.0),
            Flowable::Table {
                header: self.table.header.clone(),
                rows: self.table.rows.clone(),
                style: TableStyle::CHECKLIST,
            },
        ]
    }
}

fn paragraph(text: &str, style: ParagraphStyle) -> Flowable {
    Flowable::Paragraph {
        text: text.to_string(),
        style,
    }
}

/// A complete tracking-sheet report for one student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub title: String,
    pub groups: Vec<PageGroup>,
}

impl ReportDocument {
    /// One page group per goal, in goal-map order, all sharing `weeks`.
    pub fn build(title: &str, student_name: &str, goals: &GoalMap, weeks: &[WeekRange]) -> Self {
        let table = ChecklistTable::new(weeks);
        let groups = goals
            .iter()
            .map(|entry| PageGroup {
                title: title.to_string(),
                student_name: student_name.to_string(),
                competency: entry.competency.clone(),
                goal: entry.goal.clone(),
                table: table.clone(),
            })
            .collect();

        Self {
            title: title.to_string(),
            groups,
        }
    }

    /// Number of page groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// All groups' content separated by page breaks.
    pub fn flowables(&self) -> Vec<Flowable> {
        let mut flowables = Vec::new();
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                flowables.push(Flowable::PageBreak);
            }
            flowables.extend(group.flowables());
        }
        flowables
    }

    /// Lay the report out on US Letter pages.
    pub fn layout(&self) -> Vec<LaidOutPage> {
        layout(&self.flowables(), PageGeometry::LETTER)
    }

    /// Render the report as PDF bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        let pages = self.layout();
        log::debug!(
            "Composing {} page groups onto {} pages",
            self.groups.len(),
            pages.len()
        );
        write_pdf(&pages, PageGeometry::LETTER, &self.title)
    }
}
