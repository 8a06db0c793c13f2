use std::net::TcpStream;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::reload::message::LiveReloadMessage;

use super::{WsActor, text_frame};

impl WsActor {
    /// Add a new client connection
    pub(super) fn add_client(&self, stream: TcpStream) {
        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept(stream) {
            Ok(mut ws) => {
                let _ = ws.get_ref().set_nonblocking(true);

                if let Err(e) = ws.send(text_frame(&LiveReloadMessage::connected())) {
                    crate::debug!("reload"; "failed to send connected message: {}", e);
                    return;
                }

                let mut clients = self.clients.lock();
                clients.push(ws);
                crate::debug!("reload"; "client connected (total: {})", clients.len());
            }
            Err(e) => {
                crate::log!("reload"; "handshake failed: {}", e);
            }
        }
    }

    /// Background thread draining client frames (non-blocking poll).
    ///
    /// Clients never send anything meaningful; reading is how closed
    /// connections are noticed and pings get answered.
    pub(super) fn client_reader_loop(
        clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
        running: Arc<AtomicBool>,
    ) {
        while running.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(100));

            let mut clients = clients.lock();
            clients.retain_mut(|ws| match ws.read() {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(tungstenite::Error::Io(ref e))
                    if e.kind() == std::io::ErrorKind::WouldBlock =>
                {
                    true
                }
                Err(_) => false,
            });
        }
    }
}
