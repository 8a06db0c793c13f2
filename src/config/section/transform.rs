//! Per-step options: `[styles]`, `[scripts]`, `[images]`, `[views]`.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! browsers = ["last 8 versions"]   # browserslist query for vendor prefixes
//!
//! [scripts]
//! target = "es2015"                # transpile target
//!
//! [images]
//! quality = 80                     # JPEG quality (1-100)
//! png_level = 3                    # PNG effort (0-7)
//!
//! [views.context]
//! title = "My Site"                # globals visible to every template
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::transform::{css, js};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Browserslist queries deciding which vendor prefixes are added.
    pub browsers: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            browsers: vec!["last 8 versions".into()],
        }
    }
}

impl StylesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        css::browser_targets(&self.browsers).map_err(|e| {
            ConfigError::Validation(format!("styles.browsers is not a valid query: {e}"))
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Transpile target, e.g. `es2015` or `chrome 80`.
    pub target: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            target: "es2015".into(),
        }
    }
}

impl ScriptsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        js::check_target(&self.target).map_err(|e| {
            ConfigError::Validation(format!("scripts.target `{}` is invalid: {e}", self.target))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// JPEG re-encode quality.
    pub quality: u8,
    /// PNG compression effort, optipng style.
    pub png_level: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            png_level: 3,
        }
    }
}

impl ImagesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConfigError::Validation(format!(
                "images.quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        if self.png_level > 7 {
            return Err(ConfigError::Validation(format!(
                "images.png_level must be between 0 and 7, got {}",
                self.png_level
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewsConfig {
    /// Global variables passed to every template.
    pub context: toml::Table,
}
