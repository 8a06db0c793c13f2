//! Step error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a step stopped.
#[derive(Debug, Error)]
pub enum StepError {
    /// The source content could not be transformed (syntax errors,
    /// missing includes, undecodable images).
    #[error("{}: {message}", path.display())]
    Transform { path: PathBuf, message: String },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl StepError {
    /// Wrap a transform failure for `path`, keeping the whole cause chain.
    pub fn transform(path: &Path, err: &anyhow::Error) -> Self {
        Self::Transform {
            path: path.to_path_buf(),
            message: format!("{err:#}"),
        }
    }

    /// Build a mapper for `map_err` on IO results touching `path`.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Transform errors are reported but never fail a command.
    pub const fn is_transform(&self) -> bool {
        matches!(self, Self::Transform { .. })
    }

    /// Full message including the source error, for log output.
    pub fn detail(&self) -> String {
        match self {
            Self::Transform { .. } => self.to_string(),
            Self::Io { source, .. } => format!("{self}: {source}"),
            Self::Pattern { source, .. } => format!("{self}: {source}"),
        }
    }
}
