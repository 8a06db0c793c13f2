//! SCSS compilation using grass.

use std::path::Path;

use anyhow::{Result, anyhow};

/// Compile an SCSS entry file to expanded CSS.
///
/// Imports resolve relative to the importing file, then to the entry's
/// directory.
pub fn compile(entry: &Path) -> Result<String> {
    let mut options = grass::Options::default().style(grass::OutputStyle::Expanded);
    if let Some(dir) = entry.parent() {
        options = options.load_path(dir);
    }

    grass::from_path(entry, &options).map_err(|e| anyhow!("{e}"))
}
