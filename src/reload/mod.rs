//! Live reload over WebSocket.
//!
//! ```text
//! RunnerActor --Reload/Inject--> WsActor --JSON--> Browser
//!                                   ^
//!             server (accept loop) -+- AddClient
//! ```
//!
//! # Modules
//!
//! - `message` - JSON messages sent to the browser client
//! - `server` - WebSocket listener handing clients to the WsActor

pub mod message;
pub mod server;
