use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::actor::fs::FsActor;
use crate::actor::messages::{RunnerMsg, WsMsg};
use crate::actor::runner::RunnerActor;
use crate::actor::ws::WsActor;

const SHUTDOWN_POLL: Duration = Duration::from_millis(100);
const STOP_TIMEOUT: Duration = Duration::from_millis(500);

pub(super) struct ActorHandles {
    fs: JoinHandle<()>,
    runner: JoinHandle<()>,
    ws: JoinHandle<()>,
}

/// Run all actors concurrently.
pub(super) fn spawn_actors(fs: FsActor, runner: RunnerActor, ws: WsActor) -> ActorHandles {
    ActorHandles {
        fs: tokio::spawn(async move { fs.run().await }),
        runner: tokio::spawn(async move { runner.run().await }),
        ws: tokio::spawn(async move { ws.run().await }),
    }
}

/// Wait for Ctrl+C, or for any actor to exit when there is no signal.
pub(super) async fn wait_for_shutdown(shutdown_rx: Option<Receiver<()>>, actors: &mut ActorHandles) {
    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
    } else {
        tokio::select! {
            _ = &mut actors.fs => {}
            _ = &mut actors.runner => {}
            _ = &mut actors.ws => {}
        }
    }
}

/// Tell the runner and ws actors to stop and drop the watcher.
pub(super) async fn stop_actors(
    actors: ActorHandles,
    runner_tx: &mpsc::Sender<RunnerMsg>,
    ws_tx: &mpsc::Sender<WsMsg>,
) {
    actors.fs.abort();

    let _ = runner_tx.send(RunnerMsg::Shutdown).await;
    let _ = ws_tx.send(WsMsg::Shutdown).await;

    for handle in [actors.runner, actors.ws] {
        // A handle that already completed must not be polled again
        if !handle.is_finished() {
            let _ = tokio::time::timeout(STOP_TIMEOUT, handle).await;
        }
    }
}
