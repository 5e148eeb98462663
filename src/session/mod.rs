//! A live editing session on one board.
//!
//! [`BoardSession`] owns the [`ReorderEngine`] snapshot, applies gestures to
//! it optimistically and hands the resulting commands to a [`Dispatcher`].
//! Gestures never wait for the store; outcomes are picked up later with
//! [`BoardSession::poll_outcomes`] or [`BoardSession::settle`].

pub mod dispatcher;

pub use dispatcher::{CommandOutcome, Dispatcher};

use crate::{
    auth::AuthContext,
    domain::{BoardId, List},
    engine::{DragResult, Gesture, ReorderEngine},
    error::{Result, TaskifyError},
    notify::Notifier,
    storage::Storage,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// What the session does with its snapshot when the store rejects a command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep the optimistic snapshot as is
    KeepLocal,
    /// Reload lists and cards from the store once nothing is in flight
    #[default]
    Refetch,
}

impl FromStr for FailurePolicy {
    type Err = TaskifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keep-local" => Ok(Self::KeepLocal),
            "refetch" => Ok(Self::Refetch),
            _ => Err(TaskifyError::ConfigError(format!(
                "Invalid failure policy '{}'. Valid policies: keep-local, refetch",
                s
            ))),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepLocal => write!(f, "keep-local"),
            Self::Refetch => write!(f, "refetch"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub failure_policy: FailurePolicy,
    /// Persist the source list too when a card moves between lists
    pub persist_source_list: bool,
}

pub struct BoardSession {
    engine: ReorderEngine,
    storage: Arc<dyn Storage>,
    dispatcher: Dispatcher,
    outcomes: mpsc::UnboundedReceiver<CommandOutcome>,
    options: SessionOptions,
    next_seq: u64,
    in_flight: usize,
    needs_refetch: bool,
}

impl BoardSession {
    /// Opens a session for a board owned by the caller's organization.
    ///
    /// Fails with `Unauthorized` for an incomplete identity and with
    /// `BoardNotFound` when the board belongs to another organization.
    pub async fn open(
        ctx: &AuthContext,
        board_id: BoardId,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        options: SessionOptions,
    ) -> Result<Self> {
        let actor = ctx.authorize()?;
        let board = storage.load_board(&board_id).await?;
        if !board.is_owned_by(&actor.org_id) {
            return Err(TaskifyError::BoardNotFound(board_id.to_string()));
        }

        let lists = storage.load_lists(&board_id).await?;
        let (dispatcher, outcomes) = Dispatcher::spawn(storage.clone(), notifier);

        info!(board_id = %board_id, lists = lists.len(), "Opened board session");

        Ok(Self {
            engine: ReorderEngine::new(board_id, lists),
            storage,
            dispatcher,
            outcomes,
            options,
            next_seq: 1,
            in_flight: 0,
            needs_refetch: false,
        })
    }

    pub fn board_id(&self) -> BoardId {
        self.engine.board_id()
    }

    /// The current optimistic snapshot
    pub fn lists(&self) -> &[List] {
        self.engine.lists()
    }

    /// Number of commands queued but not yet acknowledged
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Validates a raw drag result and applies it
    pub fn handle_drag(&mut self, drag: &DragResult) -> Result<Option<u64>> {
        match Gesture::from_drag(drag)? {
            Some(gesture) => self.handle(gesture),
            None => Ok(None),
        }
    }

    /// Applies a gesture locally and queues its persistence.
    ///
    /// Returns the sequence number of the last queued command, or `None` when
    /// the gesture changed nothing. Errors leave the snapshot untouched and
    /// queue nothing.
    pub fn handle(&mut self, gesture: Gesture) -> Result<Option<u64>> {
        let Some(outcome) = self.engine.apply(gesture)? else {
            return Ok(None);
        };

        let mut last = None;
        for command in outcome.into_commands(self.options.persist_source_list) {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.dispatcher.send(seq, command)?;
            self.in_flight += 1;
            last = Some(seq);
        }
        Ok(last)
    }

    /// Processes outcomes that have already arrived, without waiting
    pub async fn poll_outcomes(&mut self) -> Result<Vec<CommandOutcome>> {
        let mut received = Vec::new();
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.record(&outcome);
            received.push(outcome);
        }
        self.reconcile().await?;
        Ok(received)
    }

    /// Waits until every queued command has been acknowledged
    pub async fn settle(&mut self) -> Result<Vec<CommandOutcome>> {
        let mut received = Vec::new();
        while self.in_flight > 0 {
            match self.outcomes.recv().await {
                Some(outcome) => {
                    self.record(&outcome);
                    received.push(outcome);
                }
                None => {
                    return Err(TaskifyError::PersistenceFailure(
                        "dispatcher has stopped".to_string(),
                    ))
                }
            }
        }
        self.reconcile().await?;
        Ok(received)
    }

    /// Replaces the snapshot with the store's current state
    pub async fn refresh(&mut self) -> Result<()> {
        let lists = self.storage.load_lists(&self.board_id()).await?;
        self.engine.replace_lists(lists);
        self.needs_refetch = false;
        debug!(board_id = %self.board_id(), "Reloaded board snapshot");
        Ok(())
    }

    /// Waits for queued commands and stops the dispatcher
    pub async fn close(self) {
        self.dispatcher.close().await;
    }

    fn record(&mut self, outcome: &CommandOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !outcome.is_success() && self.options.failure_policy == FailurePolicy::Refetch {
            self.needs_refetch = true;
        }
    }

    /// Reloading while commands are still queued would be overwritten by
    /// their later acknowledgement, so the refetch waits for an idle queue.
    async fn reconcile(&mut self) -> Result<()> {
        if self.needs_refetch && self.in_flight == 0 {
            self.refresh().await?;
        }
        Ok(())
    }
}
