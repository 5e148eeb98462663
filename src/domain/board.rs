use crate::error::{Result, TaskifyError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_id!(
    /// Unique identifier for a board
    BoardId
);

/// Identifier of the organization that owns a board.
///
/// Issued by the identity provider, so it is an opaque string rather than a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trims a title and rejects it if nothing is left
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskifyError::InvalidTitle("Title is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// A kanban board: the workspace that owns an ordered set of lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub org_id: OrgId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates a board for the given organization, validating the title
    pub fn new(org_id: OrgId, title: &str) -> Result<Self> {
        let title = validate_title(title)?;
        let now = Utc::now();
        Ok(Self {
            id: BoardId::new(),
            org_id,
            title,
            created_at: now,
            updated_at: now,
        })
    }

    /// Renames the board in place
    pub fn rename(&mut self, title: &str) -> Result<()> {
        self.title = validate_title(title)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_owned_by(&self, org_id: &OrgId) -> bool {
        &self.org_id == org_id
    }
}
