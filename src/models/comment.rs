use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::user::PublicUser;

/// A comment on a post. `author` is immutable after creation; the owning
/// post holds the reference back to this comment.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub message: String,
    pub author: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment with its author's public fields populated
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub message: String,
    pub author: PublicUser,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, author: PublicUser) -> Self {
        Self {
            id: comment.id,
            message: comment.message,
            author,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
