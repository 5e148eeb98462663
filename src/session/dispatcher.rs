//! Ordered, non-blocking delivery of persistence commands.
//!
//! One background task owns the store side of a session. Commands are queued
//! on an unbounded channel and applied one at a time, so the store sees them
//! in the order the gestures produced them.

use crate::{
    engine::PersistenceCommand,
    error::{Result, TaskifyError},
    notify::{Notification, Notifier},
    storage::Storage,
};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

/// What happened to one queued command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub seq: u64,
    /// Short user-facing message when the store rejected the command
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

struct Envelope {
    seq: u64,
    command: PersistenceCommand,
}

pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Envelope>,
    handle: JoinHandle<()>,
}

impl Dispatcher {
    /// Starts the worker task. Outcomes arrive on the returned receiver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, mpsc::UnboundedReceiver<CommandOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(storage, notifier, rx, outcome_tx));
        (Self { tx, handle }, outcome_rx)
    }

    /// Queues a command without waiting for the store
    pub fn send(&self, seq: u64, command: PersistenceCommand) -> Result<()> {
        self.tx
            .send(Envelope { seq, command })
            .map_err(|_| TaskifyError::PersistenceFailure("dispatcher has stopped".to_string()))
    }

    /// Stops accepting commands and waits for the queued ones to be applied
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            warn!("Dispatcher task ended abnormally: {}", e);
        }
    }
}

async fn run(
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    mut rx: mpsc::UnboundedReceiver<Envelope>,
    outcome_tx: mpsc::UnboundedSender<CommandOutcome>,
) {
    while let Some(Envelope { seq, command }) = rx.recv().await {
        let outcome = match storage.apply(&command).await {
            Ok(()) => {
                debug!(
                    seq,
                    board_id = %command.board_id(),
                    items = command.item_count(),
                    "Applied persistence command"
                );
                notifier.notify(Notification::success(command.success_message()));
                CommandOutcome { seq, error: None }
            }
            Err(e) => {
                warn!(seq, board_id = %command.board_id(), "Persistence command failed: {}", e);
                let message = e.user_message();
                notifier.notify(Notification::error(message.clone()));
                CommandOutcome {
                    seq,
                    error: Some(message),
                }
            }
        };

        // The session may already be gone; remaining commands still get applied.
        let _ = outcome_tx.send(outcome);
    }
}
