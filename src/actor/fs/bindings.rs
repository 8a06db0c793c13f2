//! Watch bindings: which changed paths re-run which step.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::config::PathRegistry;
use crate::core::Category;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Watch globs bound to the step they trigger.
#[derive(Debug, Clone)]
pub struct WatchBinding {
    pub category: Category,
    patterns: Vec<Pattern>,
}

impl WatchBinding {
    /// One binding per category, from its watch globs.
    pub fn from_registry(registry: &PathRegistry) -> Result<Vec<Self>, glob::PatternError> {
        registry
            .iter()
            .map(|spec| {
                let patterns = spec
                    .watch
                    .iter()
                    .map(|glob| glob.matcher())
                    .collect::<Result<_, _>>()?;
                Ok(Self {
                    category: spec.category,
                    patterns,
                })
            })
            .collect()
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_path_with(path, MATCH_OPTIONS))
    }
}

/// Categories whose bindings match any of `paths`, in build order.
pub fn affected<'a>(
    bindings: &[WatchBinding],
    paths: impl IntoIterator<Item = &'a Path>,
) -> Vec<Category> {
    let mut hit = Vec::new();
    for path in paths {
        for binding in bindings {
            if !hit.contains(&binding.category) && binding.matches(path) {
                hit.push(binding.category);
            }
        }
    }

    Category::ALL
        .into_iter()
        .filter(|category| hit.contains(category))
        .collect()
}

/// Directories to watch recursively: the watch glob bases, with roots
/// nested inside another root dropped.
pub fn watch_roots(registry: &PathRegistry) -> Vec<PathBuf> {
    let mut bases: Vec<PathBuf> = registry
        .iter()
        .flat_map(|spec| spec.watch.iter().map(|glob| glob.base.clone()))
        .collect();
    bases.sort();
    bases.dedup();

    let mut roots: Vec<PathBuf> = Vec::new();
    for base in bases {
        // Sorted order puts every ancestor before its descendants.
        if !roots.iter().any(|root| base.starts_with(root)) {
            roots.push(base);
        }
    }
    roots
}
