//! WebSocket Actor - Live Reload Broadcast
//!
//! This actor is responsible for:
//! - Completing the handshake for accepted sockets
//! - Broadcasting reload and inject messages to every client
//! - Dropping clients that close or fail
//!
//! # Architecture
//!
//! ```text
//! RunnerActor --[Reload/Inject]--> WsActor --[broadcast]--> Clients
//! ```

mod client_io;
mod delivery;

use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::messages::WsMsg;
use crate::reload::message::LiveReloadMessage;

/// WebSocket Actor - manages client connections and broadcasts
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Connected clients (shared for broadcast + read threads)
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
    /// Cleared on shutdown to stop the reader thread
    running: Arc<AtomicBool>,
}

impl WsActor {
    /// Create a new WsActor
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        let running = Arc::clone(&self.running);
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader, running);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Reload { reason } => {
                    crate::debug!("reload"; "reload: {}", reason);
                    self.broadcast(&LiveReloadMessage::reload(reason));
                }

                WsMsg::Inject { category, paths } => {
                    crate::debug!("reload"; "inject {}: {}", category, paths.join(", "));
                    self.broadcast(&LiveReloadMessage::inject(category, paths));
                }

                WsMsg::AddClient(stream) => {
                    self.add_client(stream);
                }

                WsMsg::Shutdown => {
                    crate::debug!("reload"; "shutting down");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        let mut clients = self.clients.lock();
        for mut ws in clients.drain(..) {
            let _ = ws.close(None);
            let _ = ws.flush();
        }
    }

    /// Number of connected clients.
    #[cfg(test)]
    fn client_count(&self) -> usize {
        self.clients.lock().len()
    }
}

/// Encode a protocol message as a text frame.
fn text_frame(msg: &LiveReloadMessage) -> Message {
    Message::Text(msg.to_json().into())
}
