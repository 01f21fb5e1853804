//! Document-store collaborator with one collection each for users, posts
//! and comments. Two backends: Postgres for deployments, in-memory for
//! the development profile and tests.
//!
//! Multi-document sequences (create comment, then append its reference to
//! the post) are not transactional. A failure between the two leaves an
//! orphaned comment; this is accepted behavior.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Comment, Post, Profile, User};

pub use memory::MemStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields for a new post; id and timestamps are assigned by the store
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author: Uuid,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub message: String,
    pub author: Uuid,
}

/// Replacement content for an existing post; author and comment refs are
/// untouched
#[derive(Debug, Clone)]
pub struct PostPatch {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Liveness probe for the health endpoint
    async fn ping(&self) -> StoreResult<()>;

    // Users
    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn set_bio(&self, id: Uuid, bio: &str) -> StoreResult<Option<User>>;
    async fn set_avatar(&self, id: Uuid, avatar_url: &str) -> StoreResult<Option<User>>;

    // Posts
    async fn create_post(&self, new: NewPost) -> StoreResult<Post>;
    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>>;
    /// All posts, newest first by creation time
    async fn find_posts_newest_first(&self) -> StoreResult<Vec<Post>>;
    async fn posts_by_author(&self, author: Uuid) -> StoreResult<Vec<Post>>;
    async fn update_post(&self, id: Uuid, patch: PostPatch) -> StoreResult<Option<Post>>;
    /// Returns whether a post was actually removed
    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;
    async fn append_comment_ref(&self, post_id: Uuid, comment_id: Uuid) -> StoreResult<()>;

    // Comments
    async fn create_comment(&self, new: NewComment) -> StoreResult<Comment>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    async fn update_comment(&self, id: Uuid, message: &str) -> StoreResult<Option<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;
}

pub(crate) fn profile_from_columns(bio: Option<String>, avatar: Option<String>) -> Profile {
    Profile { bio, avatar }
}
