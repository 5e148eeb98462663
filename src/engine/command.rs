use crate::domain::{BoardId, Card, List};
use serde::{Deserialize, Serialize};

/// Instruction for the store describing the complete new ordering of one
/// sibling collection.
///
/// The store applies a command atomically: it replaces the order (and for
/// cards, the list assignment) of exactly the named items, or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PersistenceCommand {
    UpdateListOrder { board_id: BoardId, items: Vec<List> },
    UpdateCardOrder { board_id: BoardId, items: Vec<Card> },
}

impl PersistenceCommand {
    pub fn board_id(&self) -> BoardId {
        match self {
            Self::UpdateListOrder { board_id, .. } | Self::UpdateCardOrder { board_id, .. } => {
                *board_id
            }
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            Self::UpdateListOrder { items, .. } => items.len(),
            Self::UpdateCardOrder { items, .. } => items.len(),
        }
    }

    /// Toast text shown when the store accepts the command
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::UpdateListOrder { .. } => "List reordered",
            Self::UpdateCardOrder { .. } => "Card reordered",
        }
    }
}

/// Result of a move that changed the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// The command to persist
    pub command: PersistenceCommand,
    /// For cross-list card moves, the renumbered cards left in the source list.
    /// They are already applied locally; persisting them is the caller's choice.
    pub source_items: Option<Vec<Card>>,
}

impl MoveOutcome {
    pub(crate) fn new(command: PersistenceCommand) -> Self {
        Self {
            command,
            source_items: None,
        }
    }

    /// Every command needed to persist the move.
    ///
    /// With `include_source` set, a cross-list move also yields a command for
    /// the source list. The destination command always comes first.
    pub fn into_commands(self, include_source: bool) -> Vec<PersistenceCommand> {
        let board_id = self.command.board_id();
        let mut commands = vec![self.command];
        if include_source {
            if let Some(items) = self.source_items {
                commands.push(PersistenceCommand::UpdateCardOrder { board_id, items });
            }
        }
        commands
    }
}
