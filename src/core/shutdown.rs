//! Ctrl+C handling.
//!
//! The handler only sends on a channel; whoever owns the dev server
//! decides how to tear it down.

use crossbeam::channel::{self, Receiver};

/// Install the Ctrl+C handler. Call once at program start.
///
/// Returns the receiving end, signalled once per Ctrl+C press.
pub fn setup_shutdown_handler() -> anyhow::Result<Receiver<()>> {
    let (tx, rx) = channel::bounded(1);
    ctrlc::set_handler(move || {
        // Second press while the first is still pending is dropped.
        let _ = tx.try_send(());
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;
    Ok(rx)
}
