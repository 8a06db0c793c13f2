//! Actor System for Watch Mode
//!
//! Message-passing concurrency for watch mode:
//!
//! ```text
//! FsActor --> RunnerActor --> WsActor
//! (watch)      (steps)      (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing
//! - `runner` - Runs steps and reports completion
//! - `ws` - WebSocket broadcast
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod runner;
pub mod ws;

pub use coordinator::Coordinator;
