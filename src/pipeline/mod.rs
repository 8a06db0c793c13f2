//! Asset pipeline: clean, the five transform steps, and the build that
//! runs them.
//!
//! # Module Structure
//!
//! ```text
//! pipeline/
//! ├── clean     # delete the build root
//! ├── build     # clean, then every step in parallel
//! ├── styles    # scss → prefixed css + min.css
//! ├── scripts   # includes → transpiled js + min.js
//! ├── fonts     # copy changed fonts
//! ├── images    # recompress images
//! ├── views     # templates → html
//! └── error     # StepError
//! ```
//!
//! Steps read every path from the registry. Inputs are resolved from the
//! source globs on each run, never cached.

mod build;
mod clean;
mod error;
mod fonts;
mod images;
mod scripts;
mod styles;
mod views;

#[cfg(test)]
mod tests;

pub use build::build;
pub use clean::clean;
pub use error::StepError;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use glob::MatchOptions;
use parking_lot::Mutex;

use crate::config::{KilnConfig, PathSpec};
use crate::core::Category;

/// Files one successful step run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutputs {
    pub category: Category,
    pub written: Vec<PathBuf>,
}

pub type StepResult = Result<StepOutputs, StepError>;

/// Runs steps against one configuration.
///
/// Holds the only state that survives between runs: when the fonts step
/// last started.
pub struct Pipeline {
    config: Arc<KilnConfig>,
    fonts_last_run: Mutex<Option<SystemTime>>,
}

impl Pipeline {
    pub fn new(config: Arc<KilnConfig>) -> Self {
        Self {
            config,
            fonts_last_run: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &KilnConfig {
        &self.config
    }

    /// Run the step for `category` to completion.
    pub fn run_step(&self, category: Category) -> StepResult {
        let config = self.config();
        let written = match category {
            Category::Styles => styles::run(config),
            Category::Scripts => scripts::run(config),
            Category::Fonts => fonts::run(config, &self.fonts_last_run),
            Category::Images => images::run(config),
            Category::Views => views::run(config),
        }?;

        Ok(StepOutputs { category, written })
    }
}

// ============================================================================
// Shared step helpers
// ============================================================================

/// An input file matched by a source glob.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceFile {
    path: PathBuf,
    /// Glob base the path was matched under.
    base: PathBuf,
    /// Path relative to `base`; outputs keep this layout under `dest`.
    relative: PathBuf,
}

impl SourceFile {
    /// Output path under `dest` with the extension replaced.
    fn output(&self, dest: &Path, extension: &str) -> PathBuf {
        dest.join(&self.relative).with_extension(extension)
    }

    /// Output path under `dest` keeping the file name.
    fn output_same(&self, dest: &Path) -> PathBuf {
        dest.join(&self.relative)
    }
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand the source globs of `spec` into files, sorted and deduplicated.
///
/// A glob that matches nothing yields nothing.
fn collect_sources(spec: &PathSpec) -> Result<Vec<SourceFile>, StepError> {
    let mut files = BTreeMap::new();

    for glob in &spec.src {
        let paths =
            glob::glob_with(&glob.pattern, MATCH_OPTIONS).map_err(|source| StepError::Pattern {
                pattern: glob.pattern.clone(),
                source,
            })?;

        for entry in paths {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                StepError::io(&path)(e.into())
            })?;
            if !path.is_file() || files.contains_key(&path) {
                continue;
            }
            let relative = path
                .strip_prefix(&glob.base)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(path.file_name().unwrap_or_default()));
            files.insert(
                path.clone(),
                SourceFile {
                    path,
                    base: glob.base.clone(),
                    relative,
                },
            );
        }
    }

    Ok(files.into_values().collect())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, StepError> {
    fs::read(path).map_err(StepError::io(path))
}

fn read_text(path: &Path) -> Result<String, StepError> {
    fs::read_to_string(path).map_err(StepError::io(path))
}

/// Write `content` to `path`, creating parent directories.
fn write_output(path: &Path, content: impl AsRef<[u8]>) -> Result<(), StepError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(StepError::io(parent))?;
    }
    fs::write(path, content).map_err(StepError::io(path))
}

/// `<stem>.min.<ext>` next to `path`.
fn min_path(path: &Path, extension: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{stem}.min.{extension}"))
}
