//! Path utilities.
//!
//! Pure functions for path manipulation, apart from `normalize_path`
//! which consults the filesystem.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// Used for paths that may not exist yet (build destinations).
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Leading directory of a glob pattern that contains no wildcard.
///
/// Mirrors how gulp computes a stream's `base`:
/// `src/assets/images/**/*.png` -> `src/assets/images`,
/// `src/assets/sass/style.scss` -> `src/assets/sass`.
pub fn glob_base(pattern: &str) -> PathBuf {
    const MAGIC: [char; 4] = ['*', '?', '[', '{'];

    let path = Path::new(pattern);
    let mut base = PathBuf::new();
    let mut components = path.components().peekable();

    while let Some(component) = components.next() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(MAGIC) {
            break;
        }
        // Last literal component is the file name, not part of the base.
        if components.peek().is_none() {
            break;
        }
        base.push(component);
    }

    base
}

/// URL path of `path` under the served `root`: `/assets/css/style.css`.
///
/// `None` when `path` is outside `root`.
pub fn to_url_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut url = String::new();
    for component in relative.components() {
        let Component::Normal(part) = component else {
            return None;
        };
        url.push('/');
        url.push_str(&part.to_string_lossy());
    }
    if url.is_empty() {
        url.push('/');
    }
    Some(url)
}

/// Check if path is a temp/backup file (editor artifacts).
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
