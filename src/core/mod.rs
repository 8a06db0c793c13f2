//! Core types - pure abstractions shared across the codebase.

mod category;
mod shutdown;

pub use category::{Category, ReloadKind};
pub use shutdown::setup_shutdown_handler;
