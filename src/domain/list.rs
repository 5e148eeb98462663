use crate::domain::{board::BoardId, card::Card, ordering::Ordered};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

uuid_id!(
    /// Unique identifier for a list
    ListId
);

/// A column on a board holding an ordered set of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub board_id: BoardId,
    pub title: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `None` when the cards were never loaded for this snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
}

impl List {
    pub fn new(board_id: BoardId, title: String, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: ListId::new(),
            board_id,
            title,
            order,
            created_at: now,
            updated_at: now,
            cards: Some(Vec::new()),
        }
    }

    /// Returns the card collection, treating an unloaded one as empty
    pub fn cards_mut(&mut self) -> &mut Vec<Card> {
        self.cards.get_or_insert_with(Vec::new)
    }

    pub fn cards(&self) -> &[Card] {
        self.cards.as_deref().unwrap_or(&[])
    }

    pub fn card_count(&self) -> usize {
        self.cards().len()
    }

    /// Copy of this list without its cards, as sent in list order commands
    pub fn without_cards(&self) -> Self {
        Self {
            cards: None,
            ..self.clone()
        }
    }
}

impl Ordered for List {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}
