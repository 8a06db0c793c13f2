//! Runner Actor
//!
//! Runs one step per `Run` message on the blocking pool, waits for it to
//! finish, then tells the WsActor how browsers should pick up the result.
//!
//! Runs are independent: a second `Run` for the same category does not
//! wait for the first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::{RunnerMsg, WsMsg};
use crate::core::{Category, ReloadKind};
use crate::logger::{status_error, status_success};
use crate::pipeline::{Pipeline, StepOutputs};
use crate::utils::path::to_url_path;
use crate::utils::plural_count;

/// Runner Actor - executes steps for the FsActor
pub struct RunnerActor {
    rx: mpsc::Receiver<RunnerMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    pipeline: Arc<Pipeline>,
}

impl RunnerActor {
    pub fn new(
        rx: mpsc::Receiver<RunnerMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        pipeline: Arc<Pipeline>,
    ) -> Self {
        Self {
            rx,
            ws_tx,
            pipeline,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                RunnerMsg::Run(category) => {
                    let pipeline = Arc::clone(&self.pipeline);
                    let ws_tx = self.ws_tx.clone();
                    tokio::spawn(run_step(pipeline, category, ws_tx));
                }
                RunnerMsg::Shutdown => {
                    crate::debug!("watch"; "runner shutting down");
                    break;
                }
            }
        }
    }
}

/// Run one step to completion and report it.
async fn run_step(pipeline: Arc<Pipeline>, category: Category, ws_tx: mpsc::Sender<WsMsg>) {
    let task_pipeline = Arc::clone(&pipeline);
    let result = tokio::task::spawn_blocking(move || task_pipeline.run_step(category)).await;

    let outputs = match result {
        Ok(Ok(outputs)) => outputs,
        Ok(Err(e)) => {
            status_error(&format!("{category} failed"), &e.detail());
            return;
        }
        Err(e) => {
            status_error(&format!("{category} panicked"), &e.to_string());
            return;
        }
    };

    status_success(&format!(
        "{category}: {}",
        plural_count(outputs.written.len(), "file")
    ));

    if let Some(msg) = reload_message(&outputs, pipeline.config().build_dir()) {
        // WsActor gone means shutdown is under way
        let _ = ws_tx.send(msg).await;
    }
}

/// The live reload message for a finished step, if browsers need one.
fn reload_message(outputs: &StepOutputs, build: &Path) -> Option<WsMsg> {
    match outputs.category.reload_kind() {
        ReloadKind::Reload => Some(WsMsg::Reload {
            reason: format!("{} rebuilt", outputs.category),
        }),
        ReloadKind::Inject => {
            let paths: Vec<String> = outputs
                .written
                .iter()
                .filter_map(|path: &PathBuf| to_url_path(build, path))
                .collect();
            (!paths.is_empty()).then_some(WsMsg::Inject {
                category: outputs.category,
                paths,
            })
        }
    }
}
