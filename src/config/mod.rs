//! Pipeline configuration from `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths] and the resolved PathRegistry
//! │   ├── serve      # [serve]
//! │   └── transform  # [styles] [scripts] [images] [views]
//! ├── error          # ConfigError
//! ├── util           # config file discovery
//! └── mod.rs         # KilnConfig (this file)
//! ```
//!
//! The file is optional. Without one, the project root is the current
//! directory and every section keeps its defaults.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{
    ImagesConfig, PathRegistry, PathSpec, PathsConfig, ScriptsConfig, ServeConfig, StylesConfig,
    ViewsConfig,
};

use crate::cli::{Cli, Commands};
use crate::core::Category;
use crate::utils::path::normalize_path;
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing kiln.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KilnConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Resolved path registry (internal use only)
    #[serde(skip)]
    pub registry: PathRegistry,

    /// Source globs and destinations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Styles step options
    #[serde(default)]
    pub styles: StylesConfig,

    /// Scripts step options
    #[serde(default)]
    pub scripts: ScriptsConfig,

    /// Images step options
    #[serde(default)]
    pub images: ImagesConfig,

    /// Views step options
    #[serde(default)]
    pub views: ViewsConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl KilnConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is
    /// the config file's parent directory, or cwd when there is none.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, root) = match find_config_file(&cwd, &cli.config) {
            Some(path) => {
                let config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                (
                    Self {
                        config_path: Some(path),
                        ..config
                    },
                    root,
                )
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                (Self::default(), cwd)
            }
        };

        config.apply_command_options(cli);
        config.finalize(&root)?;
        Ok(config)
    }

    /// Resolve paths against `root` and check invariants.
    pub fn finalize(&mut self, root: &Path) -> Result<(), ConfigError> {
        self.root = normalize_path(root);
        self.registry = PathRegistry::resolve(&self.root, &self.paths);
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.registry.validate(&self.root)?;
        self.styles.validate()?;
        self.scripts.validate()?;
        self.images.validate()
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Watch { interface, port } = &cli.command {
            if let Some(interface) = interface {
                self.serve.interface = *interface;
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
        }
    }

    /// Paths for one category.
    pub fn spec(&self, category: Category) -> &PathSpec {
        self.registry.get(category)
    }

    /// The build root.
    pub fn build_dir(&self) -> &Path {
        &self.registry.build
    }

    /// Get path relative to the project root, for log output.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> KilnConfig {
    let (parsed, ignored) = KilnConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Build a finalized config rooted at `root`.
#[cfg(test)]
pub fn test_config_at(root: &Path, content: &str) -> KilnConfig {
    let mut config = test_parse_config(content);
    config.finalize(root).unwrap();
    config
}

// ============================================================================
// tests
// ============================================================================
