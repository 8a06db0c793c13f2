//! Live reload message protocol.
//!
//! Every message is a JSON text frame tagged by `type`:
//!
//! - `connected`: sent once after the handshake
//! - `reload`: reload the whole page
//! - `inject`: refresh the listed resources in place

use serde::{Deserialize, Serialize};

use crate::core::Category;

/// Message sent to live reload clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LiveReloadMessage {
    /// Connection established
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    /// Full page reload
    Reload {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Swap changed resources without a reload
    Inject {
        /// Category name: scripts, fonts or images
        category: String,
        /// URL paths of the rewritten files, e.g. `/assets/js/main.min.js`
        paths: Vec<String>,
    },
}

impl LiveReloadMessage {
    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn inject(category: Category, paths: Vec<String>) -> Self {
        Self::Inject {
            category: category.name().to_string(),
            paths,
        }
    }

    /// Serialize to a JSON text frame.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}
