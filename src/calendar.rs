//! Monday-to-Friday week spans for a tracking term.
//!
//! A term is bounded by the first day of a start month (inclusive) and the
//! first day of an end month (exclusive). Every week that the cursor touches
//! inside those bounds contributes one row to each checklist table, starting
//! from the Monday of that week even when it falls in the previous month.

use chrono::{Datelike, Days, NaiveDate};
use std::fmt;

use crate::error::{Error, Result};

/// Weekday and month names follow this fixed pattern, e.g. `Monday, Feb 05`.
const DAY_FORMAT: &str = "%A, %b %d";

/// A validated month/year pair, anchored on the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear {
    first: NaiveDate,
}

impl MonthYear {
    /// Create a month/year pair. `month` is 1-based.
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(month));
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::InvalidYear(year))?;
        Ok(Self { first })
    }

    /// The 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }
}

/// One Monday-to-Friday span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekRange {
    pub monday: NaiveDate,
    pub friday: NaiveDate,
}

impl WeekRange {
    /// The week containing `date`, or `None` when its Monday or Friday falls
    /// outside the calendar's range.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let back = u64::from(date.weekday().num_days_from_monday());
        let monday = date.checked_sub_days(Days::new(back))?;
        let friday = monday.checked_add_days(Days::new(4))?;
        Some(Self { monday, friday })
    }

    /// Row label, e.g. `Monday, Jan 29 - Friday, Feb 02`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.monday.format(DAY_FORMAT),
            self.friday.format(DAY_FORMAT)
        )
    }
}

/// Ordered week spans from the first of `start` up to, not including, the first of `end`.
///
/// Returns an empty list when `start` is not before `end`. A week whose
/// Monday cannot be represented (the very start of the calendar) is skipped.
pub fn week_ranges(start: MonthYear, end: MonthYear) -> Vec<WeekRange> {
    let end = end.first_day();
    let mut cursor = start.first_day();
    let mut weeks = Vec::new();

    while cursor < end {
        let next_monday = match WeekRange::containing(cursor) {
            Some(week) => {
                weeks.push(week);
                // Friday + 3 is the following Monday.
                week.friday.checked_add_days(Days::new(3))
            }
            None => {
                let ahead = 7 - u64::from(cursor.weekday().num_days_from_monday());
                cursor.checked_add_days(Days::new(ahead))
            }
        };
        match next_monday {
            Some(monday) => cursor = monday,
            None => break,
        }
    }

    weeks
}

/// Week labels for raw month/year numbers.
pub fn generate_date_ranges(
    start_month: u32,
    start_year: i32,
    end_month: u32,
    end_year: i32,
) -> Result<Vec<String>> {
    let start = MonthYear::new(start_month, start_year)?;
    let end = MonthYear::new(end_month, end_year)?;
    Ok(week_ranges(start, end).iter().map(WeekRange::label).collect())
}
