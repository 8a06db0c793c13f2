//! `[paths]` section configuration: the path registry.
//!
//! Maps every asset category to its source globs, an optional wider watch
//! glob, and a destination inside the build root.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! build = "dist"
//!
//! [paths.styles]
//! src = ["src/assets/sass/style.scss"]
//! watch = ["src/assets/sass/**/*.scss"]
//! dest = "dist/assets/css"
//! ```
//!
//! Unset fields keep their defaults. Default destinations are relative to
//! the build root, configured ones to the project root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::core::Category;
use crate::utils::path::{clean_path, glob_base};

/// Raw `[paths.<category>]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOverride {
    /// Source globs, relative to the project root.
    pub src: Option<Vec<String>>,
    /// Globs that trigger a re-run in watch mode (default: `src`).
    pub watch: Option<Vec<String>>,
    /// Destination directory, relative to the project root.
    pub dest: Option<PathBuf>,
}

/// Raw `[paths]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Build root; the only directory `clean` deletes.
    pub build: PathBuf,
    pub fonts: PathOverride,
    pub images: PathOverride,
    pub scripts: PathOverride,
    pub styles: PathOverride,
    pub views: PathOverride,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            build: PathBuf::from("build"),
            fonts: PathOverride::default(),
            images: PathOverride::default(),
            scripts: PathOverride::default(),
            styles: PathOverride::default(),
            views: PathOverride::default(),
        }
    }
}

impl PathsConfig {
    fn get(&self, category: Category) -> &PathOverride {
        match category {
            Category::Fonts => &self.fonts,
            Category::Images => &self.images,
            Category::Scripts => &self.scripts,
            Category::Styles => &self.styles,
            Category::Views => &self.views,
        }
    }
}

/// Default (src, watch, dest relative to the build root) per category.
fn defaults(category: Category) -> (&'static [&'static str], &'static [&'static str], &'static str) {
    match category {
        Category::Fonts => (&["src/assets/fonts/**/*.*"], &[], "assets/fonts"),
        Category::Images => (
            &[
                "src/assets/images/**/*.jpg",
                "src/assets/images/**/*.jpeg",
                "src/assets/images/**/*.png",
                "src/assets/images/**/*.svg",
                "src/assets/images/**/*.ico",
            ],
            &[],
            "assets/img",
        ),
        Category::Scripts => (&["src/assets/js/*.js"], &[], "assets/js"),
        Category::Styles => (
            &["src/assets/sass/style.scss"],
            &["src/assets/sass/**/*.scss"],
            "assets/css",
        ),
        Category::Views => (&["src/view/*.jinja"], &["src/view/**/*.jinja"], ""),
    }
}

// ============================================================================
// Resolved registry
// ============================================================================

/// A source glob anchored at the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGlob {
    /// Absolute glob pattern.
    pub pattern: String,
    /// Directory outputs are made relative to.
    pub base: PathBuf,
}

impl SourceGlob {
    pub fn new(root: &Path, relative: &str) -> Self {
        let relative = relative.trim_start_matches("./");
        if Path::new(relative).is_absolute() {
            return Self {
                pattern: relative.to_string(),
                base: glob_base(relative),
            };
        }

        let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
        let pattern = format!(
            "{}{}{}",
            escaped_root.trim_end_matches(std::path::MAIN_SEPARATOR),
            std::path::MAIN_SEPARATOR,
            relative
        );
        Self {
            pattern,
            base: clean_path(&root.join(glob_base(relative))),
        }
    }

    /// Compile the pattern for matching watch events.
    pub fn matcher(&self) -> Result<glob::Pattern, glob::PatternError> {
        glob::Pattern::new(&self.pattern)
    }
}

/// Resolved paths for one category.
#[derive(Debug, Clone)]
pub struct PathSpec {
    pub category: Category,
    pub src: Vec<SourceGlob>,
    pub watch: Vec<SourceGlob>,
    pub dest: PathBuf,
}

/// Resolved path registry, the single source of truth for every path.
#[derive(Debug, Clone)]
pub struct PathRegistry {
    pub build: PathBuf,
    specs: Vec<PathSpec>,
}

impl Default for PathRegistry {
    fn default() -> Self {
        Self::resolve(Path::new("."), &PathsConfig::default())
    }
}

impl PathRegistry {
    /// Resolve raw config against the project root, applying defaults.
    pub fn resolve(root: &Path, raw: &PathsConfig) -> Self {
        let build = clean_path(&root.join(&raw.build));

        let specs = Category::ALL
            .iter()
            .map(|&category| {
                let (default_src, default_watch, default_dest) = defaults(category);
                let entry = raw.get(category);

                let globs = |list: &[String]| -> Vec<SourceGlob> {
                    list.iter().map(|p| SourceGlob::new(root, p)).collect()
                };
                let owned = |list: &[&str]| -> Vec<String> {
                    list.iter().map(|s| (*s).to_string()).collect()
                };

                let src_list = entry.src.clone().unwrap_or_else(|| owned(default_src));
                let watch_list = match (&entry.watch, &entry.src) {
                    (Some(watch), _) => watch.clone(),
                    // Custom sources without custom watch globs watch the sources.
                    (None, Some(src)) => src.clone(),
                    (None, None) if default_watch.is_empty() => src_list.clone(),
                    (None, None) => owned(default_watch),
                };
                let dest = match &entry.dest {
                    Some(dest) => clean_path(&root.join(dest)),
                    None => clean_path(&build.join(default_dest)),
                };

                PathSpec {
                    category,
                    src: globs(&src_list),
                    watch: globs(&watch_list),
                    dest,
                }
            })
            .collect();

        Self { build, specs }
    }

    /// Paths for one category.
    pub fn get(&self, category: Category) -> &PathSpec {
        self.specs
            .iter()
            .find(|spec| spec.category == category)
            .expect("registry holds every category")
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathSpec> {
        self.specs.iter()
    }

    /// Check the registry invariants against the project root:
    /// - the build root is a strict subdirectory of the project root
    /// - every `dest` lies inside the build root
    /// - no source or watch glob reads from inside the build root
    pub fn validate(&self, root: &Path) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if root.starts_with(&self.build) {
            problems.push(format!(
                "paths.build `{}` must be a subdirectory of the project root",
                self.build.display()
            ));
        }

        for spec in &self.specs {
            if !spec.dest.starts_with(&self.build) {
                problems.push(format!(
                    "paths.{}.dest `{}` is outside the build root `{}`",
                    spec.category,
                    spec.dest.display(),
                    self.build.display()
                ));
            }

            for glob in spec.src.iter().chain(&spec.watch) {
                if glob.base.starts_with(&self.build) || self.build.starts_with(&glob.base) {
                    problems.push(format!(
                        "paths.{} glob `{}` overlaps the build root `{}`",
                        spec.category,
                        glob.pattern,
                        self.build.display()
                    ));
                }
                if let Err(e) = glob.matcher() {
                    problems.push(format!(
                        "paths.{} glob `{}` is invalid: {}",
                        spec.category, glob.pattern, e
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("\n")))
        }
    }
}
