//! Fonts: copy files changed since the previous run started.
//!
//! The first run in a process copies everything.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use parking_lot::Mutex;

use crate::config::KilnConfig;
use crate::core::Category;
use crate::debug;
use crate::utils::mtime::is_modified_since;

use super::{StepError, collect_sources};

pub(super) fn run(
    config: &KilnConfig,
    last_run: &Mutex<Option<SystemTime>>,
) -> Result<Vec<PathBuf>, StepError> {
    let started = SystemTime::now();
    let since = *last_run.lock();
    let spec = config.spec(Category::Fonts);

    let mut written = Vec::new();
    for source in collect_sources(spec)? {
        if since.is_some_and(|since| !is_modified_since(&source.path, since)) {
            continue;
        }

        let output = source.output_same(&spec.dest);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(StepError::io(parent))?;
        }
        fs::copy(&source.path, &output).map_err(StepError::io(&source.path))?;

        debug!("fonts"; "copied {}", config.root_relative(&source.path).display());
        written.push(output);
    }

    *last_run.lock() = Some(started);
    Ok(written)
}
