//! The reorder engine.
//!
//! [`ReorderEngine`] owns the local snapshot of one board: its lists in
//! display order, each with its cards in display order. Moves mutate the
//! snapshot immediately and hand back the [`PersistenceCommand`] that makes
//! the store agree. The engine performs no I/O; see
//! [`BoardSession`](crate::session::BoardSession) for dispatch.

pub mod command;
pub mod gesture;

pub use command::{MoveOutcome, PersistenceCommand};
pub use gesture::{DragKind, DragLocation, DragResult, Gesture};

use crate::{
    domain::{
        ordering::{check_index, normalize, renumber, reorder},
        BoardId, List, ListId,
    },
    error::{Result, TaskifyError},
};
use tracing::debug;

/// Local, optimistic view of a board's lists and cards
#[derive(Debug, Clone)]
pub struct ReorderEngine {
    board_id: BoardId,
    lists: Vec<List>,
}

impl ReorderEngine {
    /// Builds an engine from lists as loaded from the store.
    ///
    /// Lists and their loaded cards are sorted by their stored order and
    /// renumbered, so the snapshot starts out contiguous.
    pub fn new(board_id: BoardId, lists: Vec<List>) -> Self {
        let mut engine = Self {
            board_id,
            lists: Vec::new(),
        };
        engine.replace_lists(lists);
        engine
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn find_list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// Installs an authoritative snapshot, e.g. after re-fetching from the store
    pub fn replace_lists(&mut self, mut lists: Vec<List>) {
        normalize(&mut lists);
        for list in &mut lists {
            if let Some(cards) = list.cards.as_mut() {
                normalize(cards);
            }
        }
        self.lists = lists;
    }

    /// Applies a validated gesture
    pub fn apply(&mut self, gesture: Gesture) -> Result<Option<MoveOutcome>> {
        match gesture {
            Gesture::List {
                source_index,
                destination_index,
            } => self.move_list(source_index, destination_index),
            Gesture::Card {
                source_list_id,
                destination_list_id,
                source_index,
                destination_index,
            } => self.move_card(
                source_list_id,
                destination_list_id,
                source_index,
                destination_index,
            ),
        }
    }

    /// Moves the list at `source_index` to `destination_index`.
    ///
    /// Every list is renumbered and the command carries the full new list
    /// ordering for the board. Returns `None` when the indices are equal.
    pub fn move_list(
        &mut self,
        source_index: usize,
        destination_index: usize,
    ) -> Result<Option<MoveOutcome>> {
        if source_index == destination_index {
            return Ok(None);
        }

        reorder(&mut self.lists, source_index, destination_index)?;
        renumber(&mut self.lists);

        debug!(
            board_id = %self.board_id,
            source_index,
            destination_index,
            "Moved list"
        );

        let items = self.lists.iter().map(List::without_cards).collect();
        Ok(Some(MoveOutcome::new(PersistenceCommand::UpdateListOrder {
            board_id: self.board_id,
            items,
        })))
    }

    /// Moves a card within a list or between two lists.
    ///
    /// Unloaded card collections are treated as empty. For a cross-list move
    /// the destination index may equal the destination's length (append).
    /// The command carries the destination list's cards; the renumbered
    /// source cards come back in [`MoveOutcome::source_items`].
    pub fn move_card(
        &mut self,
        source_list_id: ListId,
        destination_list_id: ListId,
        source_index: usize,
        destination_index: usize,
    ) -> Result<Option<MoveOutcome>> {
        if source_list_id == destination_list_id && source_index == destination_index {
            return Ok(None);
        }

        let source_pos = self.position_of(source_list_id)?;
        let dest_pos = self.position_of(destination_list_id)?;

        if source_pos == dest_pos {
            let len = self.lists[source_pos].card_count();
            check_index(source_index, len)?;
            check_index(destination_index, len)?;

            let cards = self.lists[source_pos].cards_mut();
            reorder(cards, source_index, destination_index)?;
            renumber(cards);
            let items = cards.clone();

            debug!(
                list_id = %source_list_id,
                source_index,
                destination_index,
                "Moved card within list"
            );

            return Ok(Some(MoveOutcome::new(PersistenceCommand::UpdateCardOrder {
                board_id: self.board_id,
                items,
            })));
        }

        check_index(source_index, self.lists[source_pos].card_count())?;
        check_index(destination_index, self.lists[dest_pos].card_count() + 1)?;

        let source_cards = self.lists[source_pos].cards_mut();
        let mut card = source_cards.remove(source_index);
        renumber(source_cards);
        let source_items = source_cards.clone();

        card.list_id = destination_list_id;

        let dest_cards = self.lists[dest_pos].cards_mut();
        dest_cards.insert(destination_index, card);
        renumber(dest_cards);
        let items = dest_cards.clone();

        debug!(
            source_list_id = %source_list_id,
            destination_list_id = %destination_list_id,
            source_index,
            destination_index,
            "Moved card between lists"
        );

        Ok(Some(MoveOutcome {
            command: PersistenceCommand::UpdateCardOrder {
                board_id: self.board_id,
                items,
            },
            source_items: Some(source_items),
        }))
    }

    fn position_of(&self, id: ListId) -> Result<usize> {
        self.lists
            .iter()
            .position(|list| list.id == id)
            .ok_or_else(|| TaskifyError::ListNotFound(id.to_string()))
    }
}
