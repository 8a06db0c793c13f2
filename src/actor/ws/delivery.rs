use crate::reload::message::LiveReloadMessage;

use super::{WsActor, text_frame};

impl WsActor {
    /// Broadcast a message to all connected clients
    pub(super) fn broadcast(&self, msg: &LiveReloadMessage) {
        let frame = text_frame(msg);
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("reload"; "no clients connected");
            return;
        }

        clients.retain_mut(|ws| match ws.send(frame.clone()) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast to {} clients", clients.len());
    }
}
