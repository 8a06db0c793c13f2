//! Asset category definitions.

use std::fmt;

/// Asset category, each with its own transform step and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Fonts,
    Images,
    Scripts,
    Styles,
    Views,
}

/// How connected browsers pick up a finished step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    /// Full page reload
    Reload,
    /// Swap the changed resources in place
    Inject,
}

impl Category {
    /// All categories, in build order.
    pub const ALL: [Category; 5] = [
        Self::Styles,
        Self::Scripts,
        Self::Images,
        Self::Fonts,
        Self::Views,
    ];

    /// Lowercase name used by the CLI, logs and the reload protocol.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fonts => "fonts",
            Self::Images => "images",
            Self::Scripts => "scripts",
            Self::Styles => "styles",
            Self::Views => "views",
        }
    }

    /// Styles and views reload the page, everything else is injected.
    pub fn reload_kind(self) -> ReloadKind {
        match self {
            Self::Styles | Self::Views => ReloadKind::Reload,
            Self::Scripts | Self::Fonts | Self::Images => ReloadKind::Inject,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
