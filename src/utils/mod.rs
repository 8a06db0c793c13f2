//! Utility modules shared by the pipeline and the dev server.

pub mod mime;
pub mod mtime;
pub mod path;

/// Pluralize a count for log output: `plural_count(2, "file")` -> "2 files".
pub fn plural_count(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
