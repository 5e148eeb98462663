//! Caller identity as handed over by the identity provider.

use crate::{
    domain::OrgId,
    error::{Result, TaskifyError},
};
use serde::{Deserialize, Serialize};

/// Raw identity of the caller. Either part may be missing, e.g. for a
/// signed-out user or a user with no active organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Option<String>,
    pub org_id: Option<String>,
}

/// A verified user acting within one organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub org_id: OrgId,
}

impl AuthContext {
    pub fn new(user_id: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            org_id: Some(org_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Resolves the actor, rejecting contexts without a user or organization
    pub fn authorize(&self) -> Result<Actor> {
        match (non_empty(&self.user_id), non_empty(&self.org_id)) {
            (Some(user_id), Some(org_id)) => Ok(Actor {
                user_id: user_id.to_string(),
                org_id: OrgId::new(org_id),
            }),
            _ => Err(TaskifyError::Unauthorized),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
