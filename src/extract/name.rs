//! Student name lookup.
//!
//! IEP cover pages print the student's name on the three lines directly
//! above the "Date of birth:" field. Nothing else in the template is stable
//! enough to anchor on, so a document without that block is rejected.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{Error, Result};

fn name_block() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"((?:.*\n){3})Date of birth:").expect("name block pattern is valid")
    })
}

/// Return the student's display name.
///
/// The three lines preceding the first line that starts with `Date of birth:`
/// are concatenated without separators and tabs become single spaces.
///
/// # Errors
///
/// [`Error::NameNotFound`] when no such block exists.
pub fn extract_name(text: &str) -> Result<String> {
    let caps = name_block().captures(text).ok_or(Error::NameNotFound)?;
    let block = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

    let name: String = block.lines().take(3).collect();
    let name = name.replace('\t', " ");

    log::debug!("Found student name {:?}", name);
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_lines_are_joined() {
        let text = "Alice\nBarnes\nSmith\nDate of birth: 2015-01-01";
        assert_eq!(extract_name(text).unwrap(), "AliceBarnesSmith");
    }

    #[test]
    fn test_tabs_become_spaces() {
        let text = "Header\nSmith,\tAlice\n Grade 4\n\nDate of birth: 01/01/2015\n";
        // Only the three lines right before the marker count.
        assert_eq!(extract_name(text).unwrap(), "Smith, Alice Grade 4");
    }

    #[test]
    fn test_first_match_wins() {
        let text = "a\nb\nc\nDate of birth: x\nd\ne\nf\nDate of birth: y\n";
        assert_eq!(extract_name(text).unwrap(), "abc");
    }

    #[test]
    fn test_marker_must_start_a_line() {
        let text = "a\nb\nc\nd Date of birth: x";
        assert!(matches!(extract_name(text), Err(Error::NameNotFound)));
    }

    #[test]
    fn test_missing_marker() {
        assert!(matches!(
            extract_name("Student: Alice\nGrade 3\n"),
            Err(Error::NameNotFound)
        ));
    }

    #[test]
    fn test_fewer_than_three_lines_before_marker() {
        assert!(matches!(
            extract_name("Alice\nSmith\nDate of birth: 2015"),
            Err(Error::NameNotFound)
        ));
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        assert!(matches!(
            extract_name("a\nb\nc\ndate of birth: 2015"),
            Err(Error::NameNotFound)
        ));
    }

    #[test]
    fn test_blank_lines_count_as_lines() {
        assert_eq!(
            extract_name("Alice\n\n\nDate of birth: 2015").unwrap(),
            "Alice"
        );
    }
}
