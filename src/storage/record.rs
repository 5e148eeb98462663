//! Per-board persisted state shared by the storage backends.

use crate::{
    domain::{ordering::Ordered, Board, Card, CardId, List},
    error::{Result, TaskifyError},
};
use serde::{Deserialize, Serialize};

/// A board with every list and card it owns.
///
/// Lists always carry a loaded card collection here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct BoardRecord {
    pub board: Board,
    #[serde(default)]
    pub lists: Vec<List>,
}

impl BoardRecord {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            lists: Vec::new(),
        }
    }

    /// Lists sorted by order, each with cards sorted by order
    pub fn sorted_lists(&self) -> Vec<List> {
        let mut lists = self.lists.clone();
        lists.sort_by_key(|l| l.order);
        for list in &mut lists {
            list.cards_mut().sort_by_key(|c| c.order);
        }
        lists
    }

    pub fn upsert_list(&mut self, list: &List) -> Result<()> {
        if list.board_id != self.board.id {
            return Err(TaskifyError::StorageError(format!(
                "List {} belongs to board {}, not {}",
                list.id, list.board_id, self.board.id
            )));
        }

        match self.lists.iter_mut().find(|l| l.id == list.id) {
            Some(existing) => {
                let cards = existing.cards.take();
                *existing = List {
                    cards,
                    ..list.clone()
                };
            }
            None => self.lists.push(List {
                cards: Some(Vec::new()),
                ..list.clone()
            }),
        }
        Ok(())
    }

    pub fn upsert_card(&mut self, card: &Card) -> Result<()> {
        if !self.lists.iter().any(|l| l.id == card.list_id) {
            return Err(TaskifyError::ListNotFound(card.list_id.to_string()));
        }

        self.remove_card(&card.id);
        if let Some(list) = self.lists.iter_mut().find(|l| l.id == card.list_id) {
            list.cards_mut().push(card.clone());
        }
        Ok(())
    }

    /// Works on a copy and swaps it in only when every item applied
    pub fn apply_list_order(&mut self, items: &[List]) -> Result<Vec<List>> {
        let mut next = self.lists.clone();
        for item in items {
            if item.board_id != self.board.id {
                return Err(TaskifyError::ListNotFound(item.id.to_string()));
            }
            let list = next
                .iter_mut()
                .find(|l| l.id == item.id)
                .ok_or_else(|| TaskifyError::ListNotFound(item.id.to_string()))?;
            list.set_order(item.order);
        }

        next.sort_by_key(|l| l.order);
        let updated = next
            .iter()
            .filter(|l| items.iter().any(|item| item.id == l.id))
            .map(List::without_cards)
            .collect();
        self.lists = next;
        Ok(updated)
    }

    /// Works on a copy and swaps it in only when every item applied
    pub fn apply_card_order(&mut self, items: &[Card]) -> Result<Vec<Card>> {
        let mut next = self.clone();
        let mut updated = Vec::with_capacity(items.len());

        for item in items {
            if !next.lists.iter().any(|l| l.id == item.list_id) {
                return Err(TaskifyError::ListNotFound(item.list_id.to_string()));
            }
            let mut card = next
                .remove_card(&item.id)
                .ok_or_else(|| TaskifyError::CardNotFound(item.id.to_string()))?;
            card.list_id = item.list_id;
            card.set_order(item.order);

            if let Some(list) = next.lists.iter_mut().find(|l| l.id == item.list_id) {
                list.cards_mut().push(card.clone());
            }
            updated.push(card);
        }

        for list in &mut next.lists {
            list.cards_mut().sort_by_key(|c| c.order);
        }
        self.lists = next.lists;
        Ok(updated)
    }

    fn remove_card(&mut self, id: &CardId) -> Option<Card> {
        for list in &mut self.lists {
            let cards = list.cards_mut();
            if let Some(pos) = cards.iter().position(|c| &c.id == id) {
                return Some(cards.remove(pos));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListId, OrgId};

    fn record_with_two_lists() -> (BoardRecord, ListId, ListId) {
        let board = Board::new(OrgId::new("org_1"), "Board").unwrap();
        let mut record = BoardRecord::new(board);
        let l1 = List::new(record.board.id, "L1".to_string(), 0);
        let l2 = List::new(record.board.id, "L2".to_string(), 1);
        let (l1_id, l2_id) = (l1.id, l2.id);
        record.upsert_list(&l1).unwrap();
        record.upsert_list(&l2).unwrap();
        (record, l1_id, l2_id)
    }

    #[test]
    fn test_upsert_list_keeps_cards() {
        let (mut record, l1, _) = record_with_two_lists();
        record
            .upsert_card(&Card::new(l1, "a".to_string(), 0))
            .unwrap();

        let mut renamed = record.lists[0].without_cards();
        renamed.title = "Renamed".to_string();
        record.upsert_list(&renamed).unwrap();

        assert_eq!(record.lists[0].title, "Renamed");
        assert_eq!(record.lists[0].card_count(), 1);
    }

    #[test]
    fn test_apply_list_order_is_atomic() {
        let (mut record, l1, l2) = record_with_two_lists();
        let mut first = record.lists[0].without_cards();
        first.order = 1;
        let stranger = List::new(record.board.id, "X".to_string(), 0);

        let result = record.apply_list_order(&[first.clone(), stranger]);
        assert!(matches!(result, Err(TaskifyError::ListNotFound(_))));
        assert_eq!(record.lists[0].id, l1);
        assert_eq!(record.lists[0].order, 0);

        let mut second = record.lists[1].without_cards();
        second.order = 0;
        record.apply_list_order(&[first, second]).unwrap();
        let sorted = record.sorted_lists();
        assert_eq!(sorted[0].id, l2);
        assert_eq!(sorted[1].id, l1);
    }

    #[test]
    fn test_apply_card_order_moves_between_lists() {
        let (mut record, l1, l2) = record_with_two_lists();
        let card = Card::new(l1, "p".to_string(), 0);
        record.upsert_card(&card).unwrap();

        let mut moved = card.clone();
        moved.list_id = l2;
        moved.order = 0;
        let updated = record.apply_card_order(&[moved]).unwrap();

        assert_eq!(updated[0].list_id, l2);
        let lists = record.sorted_lists();
        assert_eq!(lists[0].card_count(), 0);
        assert_eq!(lists[1].cards()[0].id, card.id);
    }

    #[test]
    fn test_apply_card_order_unknown_card_writes_nothing() {
        let (mut record, l1, l2) = record_with_two_lists();
        let card = Card::new(l1, "p".to_string(), 0);
        record.upsert_card(&card).unwrap();

        let mut moved = card.clone();
        moved.list_id = l2;
        let ghost = Card::new(l2, "ghost".to_string(), 1);

        let result = record.apply_card_order(&[moved, ghost]);
        assert!(matches!(result, Err(TaskifyError::CardNotFound(_))));
        assert_eq!(record.sorted_lists()[0].cards()[0].id, card.id);
    }

    #[test]
    fn test_upsert_card_requires_list() {
        let (mut record, _, _) = record_with_two_lists();
        let orphan = Card::new(ListId::new(), "x".to_string(), 0);
        assert!(matches!(
            record.upsert_card(&orphan),
            Err(TaskifyError::ListNotFound(_))
        ));
    }
}
