//! `//= path` include directives for scripts.
//!
//! A line holding only `//= relative/path.js` is replaced by the contents
//! of that file, resolved against the including file's directory.
//! Includes nest; a file including itself (directly or not) is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*//=[ \t]*([^ \t\r\n]+)[ \t]*$").unwrap());

/// Expand every include directive in `source`, which was read from `path`.
pub fn resolve(source: &str, path: &Path) -> Result<String> {
    let mut stack = vec![canonical(path)];
    expand(source, path, &mut stack)
}

fn expand(source: &str, path: &Path, stack: &mut Vec<PathBuf>) -> Result<String> {
    let dir = path.parent().unwrap_or(Path::new(""));
    let mut out = String::with_capacity(source.len());

    for line in source.split_inclusive('\n') {
        let body = line.trim_end_matches(['\n', '\r']);
        let Some(caps) = DIRECTIVE.captures(body) else {
            out.push_str(line);
            continue;
        };

        let target = dir.join(&caps[1]);
        let key = canonical(&target);
        if stack.contains(&key) {
            bail!(
                "include cycle: `{}` includes `{}`",
                path.display(),
                target.display()
            );
        }

        let included = fs::read_to_string(&target).with_context(|| {
            format!(
                "`{}` includes missing file `{}`",
                path.display(),
                target.display()
            )
        })?;

        stack.push(key);
        let expanded = expand(&included, &target, stack)?;
        stack.pop();

        out.push_str(&expanded);
        if !expanded.ends_with('\n') && line.ends_with('\n') {
            out.push('\n');
        }
    }

    Ok(out)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
