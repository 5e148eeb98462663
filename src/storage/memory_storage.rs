use crate::{
    domain::{Board, BoardId, Card, List, OrgId},
    error::{Result, TaskifyError},
    storage::{record::BoardRecord, Storage},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory storage backend.
///
/// Useful for tests and for hosting a session without a disk. Order updates
/// can be made to fail on demand to exercise error handling.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<BoardId, BoardRecord>>,
    simulate_write_error: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail until turned off again
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(TaskifyError::PersistenceFailure(
                "Simulated write error".to_string(),
            ));
        }
        Ok(())
    }
}

fn board_not_found(id: &BoardId) -> TaskifyError {
    TaskifyError::BoardNotFound(id.to_string())
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn save_board(&self, board: &Board) -> Result<()> {
        self.check_writable()?;
        let mut boards = self.boards.write().await;
        boards
            .entry(board.id)
            .and_modify(|record| record.board = board.clone())
            .or_insert_with(|| BoardRecord::new(board.clone()));
        Ok(())
    }

    async fn load_board(&self, id: &BoardId) -> Result<Board> {
        let boards = self.boards.read().await;
        boards
            .get(id)
            .map(|record| record.board.clone())
            .ok_or_else(|| board_not_found(id))
    }

    async fn list_boards(&self, org_id: &OrgId) -> Result<Vec<Board>> {
        let boards = self.boards.read().await;
        let mut owned: Vec<Board> = boards
            .values()
            .filter(|record| record.board.is_owned_by(org_id))
            .map(|record| record.board.clone())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn delete_board(&self, id: &BoardId) -> Result<()> {
        self.check_writable()?;
        let mut boards = self.boards.write().await;
        boards.remove(id).ok_or_else(|| board_not_found(id))?;
        debug!(board_id = %id, "Deleted board with its lists and cards");
        Ok(())
    }

    async fn save_list(&self, list: &List) -> Result<()> {
        self.check_writable()?;
        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(&list.board_id)
            .ok_or_else(|| board_not_found(&list.board_id))?;
        record.upsert_list(list)
    }

    async fn save_card(&self, board_id: &BoardId, card: &Card) -> Result<()> {
        self.check_writable()?;
        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(board_id)
            .ok_or_else(|| board_not_found(board_id))?;
        record.upsert_card(card)
    }

    async fn load_lists(&self, board_id: &BoardId) -> Result<Vec<List>> {
        let boards = self.boards.read().await;
        boards
            .get(board_id)
            .map(BoardRecord::sorted_lists)
            .ok_or_else(|| board_not_found(board_id))
    }

    async fn update_list_order(&self, board_id: &BoardId, items: &[List]) -> Result<Vec<List>> {
        self.check_writable()?;
        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(board_id)
            .ok_or_else(|| board_not_found(board_id))?;
        record.apply_list_order(items)
    }

    async fn update_card_order(&self, board_id: &BoardId, items: &[Card]) -> Result<Vec<Card>> {
        self.check_writable()?;
        let mut boards = self.boards.write().await;
        let record = boards
            .get_mut(board_id)
            .ok_or_else(|| board_not_found(board_id))?;
        record.apply_card_order(items)
    }

    async fn is_initialized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PersistenceCommand;

    async fn seeded() -> (MemoryStorage, Board, List) {
        let storage = MemoryStorage::new();
        let board = Board::new(OrgId::new("org_1"), "Board").unwrap();
        storage.save_board(&board).await.unwrap();
        let list = List::new(board.id, "Todo".to_string(), 0);
        storage.save_list(&list).await.unwrap();
        (storage, board, list)
    }

    #[tokio::test]
    async fn test_board_save_and_load() {
        let (storage, board, _) = seeded().await;
        let loaded = storage.load_board(&board.id).await.unwrap();
        assert_eq!(loaded.title, "Board");
    }

    #[tokio::test]
    async fn test_save_board_keeps_lists() {
        let (storage, mut board, _) = seeded().await;
        board.rename("Renamed").unwrap();
        storage.save_board(&board).await.unwrap();

        assert_eq!(storage.load_lists(&board.id).await.unwrap().len(), 1);
        assert_eq!(storage.load_board(&board.id).await.unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn test_list_boards_filters_by_org() {
        let (storage, _, _) = seeded().await;
        let other = Board::new(OrgId::new("org_2"), "Other").unwrap();
        storage.save_board(&other).await.unwrap();

        let boards = storage.list_boards(&OrgId::new("org_2")).await.unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0].id, other.id);
    }

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let (storage, board, list) = seeded().await;
        storage
            .save_card(&board.id, &Card::new(list.id, "a".to_string(), 0))
            .await
            .unwrap();

        storage.delete_board(&board.id).await.unwrap();

        assert!(matches!(
            storage.load_lists(&board.id).await,
            Err(TaskifyError::BoardNotFound(_))
        ));
        assert!(storage.delete_board(&board.id).await.is_err());
    }

    #[tokio::test]
    async fn test_apply_command() {
        let (storage, board, list) = seeded().await;
        let second = List::new(board.id, "Done".to_string(), 1);
        storage.save_list(&second).await.unwrap();

        let mut a = list.without_cards();
        a.order = 1;
        let mut b = second.without_cards();
        b.order = 0;
        storage
            .apply(&PersistenceCommand::UpdateListOrder {
                board_id: board.id,
                items: vec![a, b],
            })
            .await
            .unwrap();

        let lists = storage.load_lists(&board.id).await.unwrap();
        assert_eq!(lists[0].id, second.id);
        assert_eq!(lists[1].id, list.id);
    }

    #[tokio::test]
    async fn test_simulated_write_error() {
        let (storage, board, list) = seeded().await;
        storage.set_simulate_write_error(true);

        let result = storage.update_list_order(&board.id, &[list.clone()]).await;
        assert!(matches!(result, Err(TaskifyError::PersistenceFailure(_))));

        storage.set_simulate_write_error(false);
        assert!(storage.update_list_order(&board.id, &[list]).await.is_ok());
    }
}
