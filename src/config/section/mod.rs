//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module      | TOML Section                     | Purpose                         |
//! |-------------|----------------------------------|---------------------------------|
//! | `paths`     | `[paths]`                        | Source globs and destinations   |
//! | `serve`     | `[serve]`                        | Development server              |
//! | `transform` | `[styles]` `[scripts]` `[images]` `[views]` | Per-step options     |

pub mod paths;
mod serve;
mod transform;

pub use paths::{PathRegistry, PathSpec, PathsConfig};
pub use serve::ServeConfig;
pub use transform::{ImagesConfig, ScriptsConfig, StylesConfig, ViewsConfig};
