//! Output file names derived from student names.
//!
//! Student names come straight out of document text, so anything that could
//! escape the output directory or upset a filesystem is replaced.

/// Characters replaced on top of path separators and control characters.
const RESERVED: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

/// Make a student name safe to embed in a file name.
///
/// `", "` and `" "` become `_`, then path separators, control characters and
/// reserved characters become `_` as well.
pub fn sanitize_name(name: &str) -> String {
    name.replace(", ", "_")
        .replace(' ', "_")
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() || RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Output file name for a student, e.g. `Report_Term2_Barnes_Alice.pdf`.
pub fn output_file_name(prefix: &str, student_name: &str) -> String {
    format!("{}{}.pdf", prefix, sanitize_name(student_name))
}
