use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::comment::CommentView;
use super::user::PublicUser;

/// A blog post as stored. `author` is set once at creation from the
/// verified caller and never changes. `comment_ids` holds references to
/// comments in insertion order; deleting a comment does not remove its
/// reference here (orphaning is accepted).
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author: Uuid,
    #[serde(rename = "comments")]
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List view of a post: author populated, comments left as references
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author: PublicUser,
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostSummary {
    pub fn new(post: Post, author: PublicUser) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            tags: post.tags,
            author,
            comments: post.comment_ids,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Detail view of a post: author and comments fully populated
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author: PublicUser,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostDetail {
    pub fn new(post: Post, author: PublicUser, comments: Vec<CommentView>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            tags: post.tags,
            author,
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
