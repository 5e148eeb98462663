use crate::domain::{list::ListId, ordering::Ordered};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

uuid_id!(
    /// Unique identifier for a card
    CardId
);

/// A work item. Belongs to exactly one list at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub title: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(list_id: ListId, title: String, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            list_id,
            title,
            order,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Ordered for Card {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}
