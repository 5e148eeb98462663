//! # Taskify Core
//!
//! Domain models, drag-and-drop reordering and persistence sync for Taskify
//! kanban boards.
//!
//! The [`engine::ReorderEngine`] keeps an optimistic snapshot of a board's
//! lists and cards and turns each move into a [`engine::PersistenceCommand`].
//! A [`session::BoardSession`] feeds those commands to a [`Storage`] backend
//! in order, without blocking further moves, and reports outcomes through a
//! [`notify::Notifier`].

pub mod actions;
pub mod auth;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use auth::{Actor, AuthContext};
pub use config::Config;
pub use domain::{Board, BoardId, Card, CardId, List, ListId, OrgId};
pub use engine::{DragResult, Gesture, MoveOutcome, PersistenceCommand, ReorderEngine};
pub use error::{Result, TaskifyError};
pub use session::{BoardSession, FailurePolicy, SessionOptions};
pub use storage::Storage;
