//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! FsActor --Run--> RunnerActor --Reload/Inject--> WsActor
//! ```

use std::net::TcpStream;

use crate::core::Category;

// =============================================================================
// RunnerActor Messages
// =============================================================================

/// Messages to Runner Actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerMsg {
    /// Run the step for one category
    Run(Category),
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Reload every page
    Reload { reason: String },
    /// Refresh resources in place
    Inject {
        category: Category,
        /// URL paths under the build root
        paths: Vec<String>,
    },
    /// Add client (handshake pending)
    AddClient(TcpStream),
    /// Shutdown
    Shutdown,
}
