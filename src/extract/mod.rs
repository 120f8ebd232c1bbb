//! Student record extraction from IEP document text.
//!
//! Both extractors assume the district IEP template: a name block directly
//! above "Date of birth:" and goals written as `GOAL ... MEANS` spans.
//! Documents laid out differently fail with typed errors instead of
//! producing partial records.

mod goals;
mod name;
mod options;

pub use goals::{
    extract_goals, extract_goals_with_mode, is_fully_upper, split_title_and_goal, title_case,
    GoalEntry, GoalMap,
};
pub use name::extract_name;
pub use options::{ErrorMode, ExtractOptions};

use serde::Serialize;

use crate::error::Result;

/// Everything a report needs from one IEP document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    /// Display name as printed above the birth date
    pub name: String,

    /// Competency goals in document order
    pub goals: GoalMap,
}

impl StudentRecord {
    /// Extract a record from document text.
    pub fn from_text(text: &str, options: ExtractOptions) -> Result<Self> {
        let name = extract_name(text)?;
        let goals = extract_goals_with_mode(text, options.error_mode)?;
        Ok(Self { name, goals })
    }
}
