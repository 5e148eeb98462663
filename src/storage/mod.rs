use crate::{
    domain::{Board, BoardId, Card, List, OrgId},
    engine::PersistenceCommand,
    error::Result,
};
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;
mod record;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// Storage trait for persisting boards, lists and cards
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Creates or replaces a board's own fields. Lists and cards are untouched.
    async fn save_board(&self, board: &Board) -> Result<()>;

    /// Loads a board by ID
    async fn load_board(&self, id: &BoardId) -> Result<Board>;

    /// Lists the boards owned by an organization, newest first
    async fn list_boards(&self, org_id: &OrgId) -> Result<Vec<Board>>;

    /// Deletes a board together with its lists and cards
    async fn delete_board(&self, id: &BoardId) -> Result<()>;

    /// Creates or replaces a list. Its `cards` field is ignored.
    async fn save_list(&self, list: &List) -> Result<()>;

    /// Creates or replaces a card on the given board
    async fn save_card(&self, board_id: &BoardId, card: &Card) -> Result<()>;

    /// Loads a board's lists with their cards, both sorted by order
    async fn load_lists(&self, board_id: &BoardId) -> Result<Vec<List>>;

    /// Applies a full list ordering for a board.
    ///
    /// Atomic: if any item is unknown nothing is written. Returns the updated
    /// lists without cards.
    async fn update_list_order(&self, board_id: &BoardId, items: &[List]) -> Result<Vec<List>>;

    /// Applies order and list assignment for a set of cards on a board.
    ///
    /// Atomic like [`Storage::update_list_order`]. Returns the updated cards.
    async fn update_card_order(&self, board_id: &BoardId, items: &[Card]) -> Result<Vec<Card>>;

    /// Checks if the storage backend is ready
    async fn is_initialized(&self) -> bool;

    /// Applies a persistence command emitted by the reorder engine
    async fn apply(&self, command: &PersistenceCommand) -> Result<()> {
        match command {
            PersistenceCommand::UpdateListOrder { board_id, items } => {
                self.update_list_order(board_id, items).await?;
            }
            PersistenceCommand::UpdateCardOrder { board_id, items } => {
                self.update_card_order(board_id, items).await?;
            }
        }
        Ok(())
    }
}
