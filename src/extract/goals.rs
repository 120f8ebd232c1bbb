//! Competency goal extraction.
//!
//! Each goal in an IEP is printed as `GOAL <COMPETENCY IN CAPITALS> <goal
//! statement> MEANS ...`. The competency title is the leading run of
//! fully capitalised words; the goal statement starts at the first word that
//! is neither all capitals nor a single character.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use super::options::ErrorMode;
use crate::error::{Error, Result};

fn goal_span() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)GOAL(.*?)MEANS").expect("goal span pattern is valid"))
}

/// One competency and its goal statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalEntry {
    pub competency: String,
    pub goal: String,
}

/// Goals keyed by competency title, in first-insertion order.
///
/// Inserting a title that is already present replaces its goal text but keeps
/// its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GoalMap {
    entries: Vec<GoalEntry>,
}

impl GoalMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a goal, returning the goal text it replaced.
    pub fn insert(&mut self, competency: String, goal: String) -> Option<String> {
        match self.entries.iter_mut().find(|e| e.competency == competency) {
            Some(entry) => Some(std::mem::replace(&mut entry.goal, goal)),
            None => {
                self.entries.push(GoalEntry { competency, goal });
                None
            }
        }
    }

    /// Goal text for a competency title.
    pub fn get(&self, competency: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.competency == competency)
            .map(|e| e.goal.as_str())
    }

    /// Number of competencies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no goals were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, GoalEntry> {
        self.entries.iter()
    }

    /// Competency titles in insertion order.
    pub fn competencies(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.competency.as_str())
    }
}

impl<'a> IntoIterator for &'a GoalMap {
    type Item = &'a GoalEntry;
    type IntoIter = std::slice::Iter<'a, GoalEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Extract goals, failing on the first malformed block.
pub fn extract_goals(text: &str) -> Result<GoalMap> {
    extract_goals_with_mode(text, ErrorMode::Strict)
}

/// Extract goals with the given error mode.
///
/// Text without any `GOAL...MEANS` span yields an empty map.
pub fn extract_goals_with_mode(text: &str, mode: ErrorMode) -> Result<GoalMap> {
    let mut goals = GoalMap::new();

    for (index, caps) in goal_span().captures_iter(text).enumerate() {
        let span = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let block = span.replace(['\t', '\n'], " ");
        let block = block.trim();

        match split_title_and_goal(block) {
            Some((title, goal)) => {
                let title = title_case(&title);
                if goals.insert(title.clone(), goal).is_some() {
                    log::debug!("Goal for {:?} replaced by a later block", title);
                }
            }
            None => {
                let err = Error::MalformedGoalBlock {
                    index,
                    block: block.to_string(),
                };
                if mode == ErrorMode::Strict {
                    return Err(err);
                }
                log::warn!("Skipping {}", err);
            }
        }
    }

    log::debug!("Extracted {} goals", goals.len());
    Ok(goals)
}

/// Split a cleaned block at its first word that is not fully upper-case and
/// longer than one character.
///
/// Returns `None` when no word qualifies.
pub fn split_title_and_goal(block: &str) -> Option<(String, String)> {
    let words: Vec<&str> = block.split_whitespace().collect();
    let at = words
        .iter()
        .position(|w| !is_fully_upper(w) && w.chars().count() > 1)?;

    Some((words[..at].join(" "), words[at..].join(" ")))
}

/// True when the word has at least one cased letter and none in lower case.
pub fn is_fully_upper(word: &str) -> bool {
    let mut cased = false;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// Capitalise the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_goal() {
        let goals = extract_goals(
            "GOAL READING COMPREHENSION Student will read at grade level. MEANS assessed quarterly",
        )
        .unwrap();

        assert_eq!(goals.len(), 1);
        assert_eq!(
            goals.get("Reading Comprehension"),
            Some("Student will read at grade level.")
        );
    }

    #[test]
    fn test_no_goals_is_empty() {
        let goals = extract_goals("Nothing to see here.\nDate of birth: 2015").unwrap();
        assert!(goals.is_empty());
    }

    #[test]
    fn test_span_crosses_lines_and_tabs() {
        let text = "GOAL\tWRITTEN\nEXPRESSION\nStudent will\twrite a\nparagraph.\nMEANS";
        let goals = extract_goals(text).unwrap();
        assert_eq!(
            goals.get("Written Expression"),
            Some("Student will write a paragraph.")
        );
    }

    #[test]
    fn test_multiple_goals_keep_order() {
        let text = "GOAL MATH Solve problems MEANS x\n\
                    GOAL SOCIAL SKILLS Take turns MEANS y\n\
                    GOAL ORAL LANGUAGE Retell stories MEANS z";
        let goals = extract_goals(text).unwrap();
        let titles: Vec<&str> = goals.competencies().collect();
        assert_eq!(titles, ["Math", "Social Skills", "Oral Language"]);
    }

    #[test]
    fn test_duplicate_titles_last_wins_in_place() {
        let text = "GOAL MATH First goal MEANS\n\
                    GOAL READING Read MEANS\n\
                    GOAL math Second goal MEANS";
        // "math" is not upper-case, so the third block has an empty title.
        let goals = extract_goals(text).unwrap();
        assert_eq!(goals.len(), 3);

        let text = "GOAL MATH First goal MEANS GOAL READING Read MEANS GOAL MATH Second goal MEANS";
        let goals = extract_goals(text).unwrap();
        assert_eq!(goals.len(), 2);
        assert_eq!(goals.get("Math"), Some("Second goal"));
        assert_eq!(goals.competencies().next(), Some("Math"));
    }

    #[test]
    fn test_single_letters_stay_in_title() {
        let goals = extract_goals("GOAL MATH a Student will count MEANS").unwrap();
        assert_eq!(goals.get("Math A"), Some("Student will count"));
    }

    #[test]
    fn test_malformed_block_strict() {
        let err = extract_goals("GOAL READING ALOUD MEANS").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedGoalBlock { index: 0, ref block } if block == "READING ALOUD"
        ));
    }

    #[test]
    fn test_malformed_block_lenient_skips() {
        let text = "GOAL READING ALOUD MEANS GOAL MATH Count to ten MEANS";
        let goals = extract_goals_with_mode(text, ErrorMode::Lenient).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals.get("Math"), Some("Count to ten"));
    }

    #[test]
    fn test_empty_span_is_malformed() {
        assert!(matches!(
            extract_goals("GOALMEANS"),
            Err(Error::MalformedGoalBlock { .. })
        ));
    }

    #[test]
    fn test_is_fully_upper() {
        assert!(is_fully_upper("READING"));
        assert!(is_fully_upper("(ELA)"));
        assert!(is_fully_upper("K-2"));
        assert!(!is_fully_upper("Reading"));
        assert!(!is_fully_upper("1."));
        assert!(!is_fully_upper(""));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("READING COMPREHENSION"), "Reading Comprehension");
        assert_eq!(title_case("SELF-REGULATION"), "Self-Regulation");
        assert_eq!(title_case("MATH 2B"), "Math 2B");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_split_title_and_goal() {
        assert_eq!(
            split_title_and_goal("MATH Add numbers"),
            Some(("MATH".to_string(), "Add numbers".to_string()))
        );
        assert_eq!(
            split_title_and_goal("Add numbers"),
            Some((String::new(), "Add numbers".to_string()))
        );
        assert_eq!(split_title_and_goal("MATH I"), None);
    }
}
