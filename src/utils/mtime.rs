//! Mtime-based change detection.
//!
//! Used by the fonts step, which only copies files touched since its
//! previous run.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if a file was modified after `since`.
///
/// Unreadable mtimes count as changed so the file is never silently skipped.
pub fn is_modified_since(path: &Path, since: SystemTime) -> bool {
    get_mtime(path).is_none_or(|mtime| mtime > since)
}
