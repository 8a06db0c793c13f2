//! Actor Coordinator - Wires up the Watch Mode Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Starts the live reload listener and the dev server
//! - Runs the actors until Ctrl+C, then tears everything down

mod runtime;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::{FsActor, WatchBinding, watch_roots};
use super::messages::{RunnerMsg, WsMsg};
use super::runner::RunnerActor;
use super::ws::WsActor;
use crate::pipeline::Pipeline;
use crate::serve::DevServer;
use crate::{debug, log};

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    pipeline: Arc<Pipeline>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            shutdown_rx: None,
        }
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run watch mode until shutdown.
    pub async fn run(self) -> Result<()> {
        let config = self.pipeline.config();
        let serve = &config.serve;

        let (runner_tx, runner_rx) = mpsc::channel::<RunnerMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        let ws_server = crate::reload::server::start(serve.interface, serve.ws_port, ws_tx.clone())
            .context("failed to start live reload server")?;
        debug!("reload"; "ws://{}:{}", serve.interface, ws_server.port());

        let dev_server = Arc::new(DevServer::bind(
            serve.interface,
            serve.port,
            config.build_dir(),
            ws_server.port(),
        )?);
        log!("serve"; "http://{}", dev_server.addr());

        let bindings = WatchBinding::from_registry(&config.registry)?;
        let roots = watch_roots(&config.registry);
        for root in &roots {
            debug!("watch"; "{}", config.root_relative(root).display());
        }
        let fs_actor = FsActor::new(roots, bindings, runner_tx.clone())
            .map_err(|e| anyhow!("watcher failed: {}", e))?;
        let runner_actor = RunnerActor::new(runner_rx, ws_tx.clone(), Arc::clone(&self.pipeline));
        let ws_actor = WsActor::new(ws_rx);

        let http = {
            let server = Arc::clone(&dev_server);
            std::thread::spawn(move || {
                if let Err(e) = server.run() {
                    log!("serve"; "error: {}", e);
                }
            })
        };

        debug!("actor"; "start");
        let mut actors = runtime::spawn_actors(fs_actor, runner_actor, ws_actor);
        runtime::wait_for_shutdown(self.shutdown_rx, &mut actors).await;

        dev_server.unblock();
        runtime::stop_actors(actors, &runner_tx, &ws_tx).await;
        let _ = tokio::task::spawn_blocking(move || {
            ws_server.stop();
            let _ = http.join();
        })
        .await;

        debug!("actor"; "stopped");
        Ok(())
    }
}
