//! Debounced auto-save engine.
//!
//! A single background task owns the debounce deadline and is driven over
//! a command channel: every edit sends `Touched`, which pushes the
//! deadline out to "now + quiet period"; when the deadline finally fires
//! the engine takes the client lock and saves with [`Trigger::Auto`]. The
//! dirty check at fire time makes a fire after a manual save a no-op, so
//! the timer never needs cancelling for that case. The explicit
//! cancellation points are disable, flush, and shutdown.
//!
//! A failed auto-save only logs: the draft stays dirty, and the engine
//! simply tries again after the next edit's quiet period.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use super::Trigger;
use crate::client::Client;

/// Commands understood by the engine task.
#[derive(Debug)]
pub(crate) enum AutoSaveCommand {
    /// An edit happened; restart the quiet period.
    Touched,
    /// Pause or resume without tearing the task down. Pausing clears any
    /// pending deadline.
    SetEnabled(bool),
    /// Save now if dirty, regardless of the deadline.
    Flush,
    /// Stop the task.
    Shutdown,
}

/// Handle to a running auto-save engine.
///
/// Owned by the [`Client`]; dropping the handle also stops the task once
/// its channel drains.
pub struct AutoSaveHandle {
    tx: mpsc::Sender<AutoSaveCommand>,
    task: JoinHandle<()>,
}

impl AutoSaveHandle {
    /// Spawn the engine task.
    pub(crate) fn spawn(client: Client, quiet: Duration) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(run(client, quiet, rx));
        Self { tx, task }
    }

    pub(crate) async fn touched(&self) {
        let _ = self.tx.send(AutoSaveCommand::Touched).await;
    }

    pub(crate) async fn set_enabled(&self, enabled: bool) {
        let _ = self.tx.send(AutoSaveCommand::SetEnabled(enabled)).await;
    }

    pub(crate) async fn flush(&self) {
        let _ = self.tx.send(AutoSaveCommand::Flush).await;
    }

    /// Stop the engine and wait for the task to finish.
    pub(crate) async fn shutdown(self) {
        let _ = self.tx.send(AutoSaveCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

async fn run(client: Client, quiet: Duration, mut rx: mpsc::Receiver<AutoSaveCommand>) {
    let mut enabled = true;
    let mut deadline: Option<Instant> = None;

    debug!(quiet_secs = quiet.as_secs(), "auto-save engine started");
    loop {
        let fire = {
            let deadline = deadline;
            async move {
                match deadline {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending().await,
                }
            }
        };

        tokio::select! {
            command = rx.recv() => match command {
                Some(AutoSaveCommand::Touched) => {
                    if enabled {
                        deadline = Some(Instant::now() + quiet);
                    }
                }
                Some(AutoSaveCommand::SetEnabled(on)) => {
                    enabled = on;
                    if !on {
                        deadline = None;
                    }
                }
                Some(AutoSaveCommand::Flush) => {
                    deadline = None;
                    save(&client).await;
                }
                Some(AutoSaveCommand::Shutdown) | None => break,
            },
            _ = fire => {
                deadline = None;
                save(&client).await;
            }
        }
    }
    debug!("auto-save engine stopped");
}

async fn save(client: &Client) {
    match client.save_with(Trigger::Auto).await {
        Ok(report) if report.skipped_clean => debug!("auto-save skipped, draft already clean"),
        Ok(_) => debug!("auto-saved profile"),
        Err(err) => warn!(error = %err, "auto-save failed, draft stays dirty"),
    }
}
