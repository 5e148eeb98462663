//! Authorized board, list and card mutations.
//!
//! Every action resolves the caller first and only touches boards owned by
//! the caller's organization. A board of another organization is reported as
//! not found.

use crate::{
    auth::{Actor, AuthContext},
    domain::{
        ordering::{is_contiguous, normalize},
        validate_title, Board, BoardId, Card, List, ListId,
    },
    error::{Result, TaskifyError},
    storage::Storage,
};
use tracing::{debug, info};

/// Creates a board in the caller's organization
pub async fn create_board(ctx: &AuthContext, storage: &dyn Storage, title: &str) -> Result<Board> {
    let actor = ctx.authorize()?;
    let board = Board::new(actor.org_id.clone(), title)?;
    storage.save_board(&board).await?;

    info!(board_id = %board.id, org_id = %actor.org_id, "Created board");
    Ok(board)
}

/// Renames a board
pub async fn update_board(
    ctx: &AuthContext,
    storage: &dyn Storage,
    id: &BoardId,
    title: &str,
) -> Result<Board> {
    let actor = ctx.authorize()?;
    let mut board = load_owned_board(&actor, storage, id).await?;
    board.rename(title)?;
    storage.save_board(&board).await?;

    info!(board_id = %board.id, "Renamed board");
    Ok(board)
}

/// Deletes a board with all of its lists and cards
pub async fn delete_board(ctx: &AuthContext, storage: &dyn Storage, id: &BoardId) -> Result<()> {
    let actor = ctx.authorize()?;
    load_owned_board(&actor, storage, id).await?;
    storage.delete_board(id).await?;

    info!(board_id = %id, "Deleted board");
    Ok(())
}

/// Boards of the caller's organization, newest first
pub async fn list_boards(ctx: &AuthContext, storage: &dyn Storage) -> Result<Vec<Board>> {
    let actor = ctx.authorize()?;
    storage.list_boards(&actor.org_id).await
}

/// Appends a list to the end of a board
pub async fn create_list(
    ctx: &AuthContext,
    storage: &dyn Storage,
    board_id: &BoardId,
    title: &str,
) -> Result<List> {
    let actor = ctx.authorize()?;
    let title = validate_title(title)?;
    load_owned_board(&actor, storage, board_id).await?;

    let mut lists: Vec<List> = storage
        .load_lists(board_id)
        .await?
        .iter()
        .map(List::without_cards)
        .collect();
    if !is_contiguous(&lists) {
        normalize(&mut lists);
        storage.update_list_order(board_id, &lists).await?;
    }

    let list = List::new(*board_id, title, lists.len() as u32);
    storage.save_list(&list).await?;

    info!(board_id = %board_id, list_id = %list.id, order = list.order, "Created list");
    Ok(list)
}

/// Appends a card to the end of a list
pub async fn create_card(
    ctx: &AuthContext,
    storage: &dyn Storage,
    board_id: &BoardId,
    list_id: &ListId,
    title: &str,
) -> Result<Card> {
    let actor = ctx.authorize()?;
    let title = validate_title(title)?;
    load_owned_board(&actor, storage, board_id).await?;

    let lists = storage.load_lists(board_id).await?;
    let list = lists
        .iter()
        .find(|l| &l.id == list_id)
        .ok_or_else(|| TaskifyError::ListNotFound(list_id.to_string()))?;

    // A cross-list move persisted without its source list leaves gaps behind
    let mut cards = list.cards().to_vec();
    if !is_contiguous(&cards) {
        normalize(&mut cards);
        storage.update_card_order(board_id, &cards).await?;
        debug!(list_id = %list_id, cards = cards.len(), "Renumbered stored cards");
    }

    let card = Card::new(*list_id, title, cards.len() as u32);
    storage.save_card(board_id, &card).await?;

    info!(list_id = %list_id, card_id = %card.id, order = card.order, "Created card");
    Ok(card)
}

async fn load_owned_board(actor: &Actor, storage: &dyn Storage, id: &BoardId) -> Result<Board> {
    let board = storage.load_board(id).await?;
    if !board.is_owned_by(&actor.org_id) {
        return Err(TaskifyError::BoardNotFound(id.to_string()));
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ctx() -> AuthContext {
        AuthContext::new("user_1", "org_1")
    }

    #[tokio::test]
    async fn test_create_board() {
        let storage = MemoryStorage::new();
        let board = create_board(&ctx(), &storage, "Launch").await.unwrap();

        assert_eq!(board.org_id.as_str(), "org_1");
        let loaded = storage.load_board(&board.id).await.unwrap();
        assert_eq!(loaded.title, "Launch");
    }

    #[tokio::test]
    async fn test_create_board_requires_auth() {
        let storage = MemoryStorage::new();
        let result = create_board(&AuthContext::anonymous(), &storage, "Launch").await;
        assert!(matches!(result, Err(TaskifyError::Unauthorized)));
        assert!(list_boards(&ctx(), &storage).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_board_rejects_blank_title() {
        let storage = MemoryStorage::new();
        let result = create_board(&ctx(), &storage, "  ").await;
        assert!(matches!(result, Err(TaskifyError::InvalidTitle(_))));
    }

    #[tokio::test]
    async fn test_update_board_title() {
        let storage = MemoryStorage::new();
        let board = create_board(&ctx(), &storage, "Launch").await.unwrap();

        let updated = update_board(&ctx(), &storage, &board.id, "Launch v2")
            .await
            .unwrap();
        assert_eq!(updated.title, "Launch v2");
        assert_eq!(
            storage.load_board(&board.id).await.unwrap().title,
            "Launch v2"
        );
    }

    #[tokio::test]
    async fn test_other_org_cannot_touch_board() {
        let storage = MemoryStorage::new();
        let board = create_board(&ctx(), &storage, "Launch").await.unwrap();
        let intruder = AuthContext::new("user_2", "org_2");

        let renamed = update_board(&intruder, &storage, &board.id, "Mine").await;
        assert!(matches!(renamed, Err(TaskifyError::BoardNotFound(_))));

        let deleted = delete_board(&intruder, &storage, &board.id).await;
        assert!(matches!(deleted, Err(TaskifyError::BoardNotFound(_))));

        assert!(list_boards(&intruder, &storage).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_board() {
        let storage = MemoryStorage::new();
        let board = create_board(&ctx(), &storage, "Launch").await.unwrap();
        create_list(&ctx(), &storage, &board.id, "Todo").await.unwrap();

        delete_board(&ctx(), &storage, &board.id).await.unwrap();

        assert!(list_boards(&ctx(), &storage).await.unwrap().is_empty());
        assert!(storage.load_lists(&board.id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_list_and_card_append() {
        let storage = MemoryStorage::new();
        let board = create_board(&ctx(), &storage, "Launch").await.unwrap();

        let todo = create_list(&ctx(), &storage, &board.id, "Todo").await.unwrap();
        let done = create_list(&ctx(), &storage, &board.id, "Done").await.unwrap();
        assert_eq!(todo.order, 0);
        assert_eq!(done.order, 1);

        let first = create_card(&ctx(), &storage, &board.id, &todo.id, "a")
            .await
            .unwrap();
        let second = create_card(&ctx(), &storage, &board.id, &todo.id, "b")
            .await
            .unwrap();
        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);

        let missing = create_card(&ctx(), &storage, &board.id, &ListId::new(), "c").await;
        assert!(matches!(missing, Err(TaskifyError::ListNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_closes_gaps_before_appending() {
        let storage = MemoryStorage::new();
        let board = create_board(&ctx(), &storage, "Launch").await.unwrap();
        let todo = create_list(&ctx(), &storage, &board.id, "Todo").await.unwrap();

        // Stored orders with a hole at 0, as a move out of the list leaves them
        for (title, order) in [("b", 1), ("c", 2)] {
            let card = Card::new(todo.id, title.to_string(), order);
            storage.save_card(&board.id, &card).await.unwrap();
        }
        let done = List::new(board.id, "Done".to_string(), 3);
        storage.save_list(&done).await.unwrap();

        let card = create_card(&ctx(), &storage, &board.id, &todo.id, "d")
            .await
            .unwrap();
        assert_eq!(card.order, 2);

        let list = create_list(&ctx(), &storage, &board.id, "Later").await.unwrap();
        assert_eq!(list.order, 2);

        let stored = storage.load_lists(&board.id).await.unwrap();
        assert!(is_contiguous(&stored));
        assert!(is_contiguous(stored[0].cards()));
        let titles: Vec<&str> = stored[0].cards().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "d"]);
    }
}
