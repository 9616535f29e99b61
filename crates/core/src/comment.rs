//! Comments attached to a journal entry.
//!
//! Comments are owned by their parent entry and append-only through the API;
//! any authenticated identity that can read the entry may comment on it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::{Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: UserId,
    /// Display name captured when the comment was written.
    pub author_display_name: String,
    pub body: String,
    pub created_at: Timestamp,
}

impl Comment {
    /// Build a new comment, rejecting a blank body.
    pub fn new(
        author_id: UserId,
        author_display_name: String,
        body: String,
        created_at: Timestamp,
    ) -> Result<Self, CoreError> {
        if body.trim().is_empty() {
            return Err(CoreError::Validation("Comment body is required".into()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            author_display_name,
            body,
            created_at,
        })
    }
}
