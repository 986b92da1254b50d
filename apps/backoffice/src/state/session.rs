//! # Session
//!
//! The authenticated owner. Identity comes from the external auth
//! collaborator; this crate only carries it.

use crate::error::ApiError;

/// Owner identity for the current caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner_id: String,
}

impl Session {
    /// Builds a session for `owner_id`. Blank owners are rejected.
    pub fn new(owner_id: impl Into<String>) -> Result<Self, ApiError> {
        let owner_id = owner_id.into().trim().to_string();
        if owner_id.is_empty() {
            return Err(ApiError::validation("owner is required"));
        }
        Ok(Session { owner_id })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}
