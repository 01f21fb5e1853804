//! In-memory store backend. Default for the development profile and used
//! by the integration tests; state lives for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Comment, Post, Profile, User};

use super::{NewComment, NewPost, PostPatch, Store, StoreResult};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    // Monotonic insertion counter; breaks creation-time ties when sorting
    seq: u64,
    post_seq: HashMap<Uuid, u64>,
}

#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Collections>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            profile: Profile::default(),
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn set_bio(&self, id: Uuid, bio: &str) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.profile.bio = Some(bio.to_string());
            user.clone()
        }))
    }

    async fn set_avatar(&self, id: Uuid, avatar_url: &str) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.profile.avatar = Some(avatar_url.to_string());
            user.clone()
        }))
    }

    async fn create_post(&self, new: NewPost) -> StoreResult<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: new.title,
            body: new.body,
            tags: new.tags,
            author: new.author,
            comment_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.seq += 1;
        let seq = inner.seq;
        inner.post_seq.insert(post.id, seq);
        inner.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn find_posts_newest_first(&self) -> StoreResult<Vec<Post>> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner.posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            let seq = |p: &Post| inner.post_seq.get(&p.id).copied().unwrap_or(0);
            (b.created_at, seq(b)).cmp(&(a.created_at, seq(a)))
        });
        Ok(posts)
    }

    async fn posts_by_author(&self, author: Uuid) -> StoreResult<Vec<Post>> {
        let mut posts = self.find_posts_newest_first().await?;
        posts.retain(|p| p.author == author);
        Ok(posts)
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> StoreResult<Option<Post>> {
        let mut inner = self.inner.write().await;
        Ok(inner.posts.get_mut(&id).map(|post| {
            post.title = patch.title;
            post.body = patch.body;
            post.tags = patch.tags;
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        inner.post_seq.remove(&id);
        Ok(inner.posts.remove(&id).is_some())
    }

    async fn append_comment_ref(&self, post_id: Uuid, comment_id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(post) = inner.posts.get_mut(&post_id) {
            post.comment_ids.push(comment_id);
            post.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn create_comment(&self, new: NewComment) -> StoreResult<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            message: new.message,
            author: new.author,
            created_at: now,
            updated_at: now,
        };

        let mut inner = self.inner.write().await;
        inner.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.inner.read().await.comments.get(&id).cloned())
    }

    async fn update_comment(&self, id: Uuid, message: &str) -> StoreResult<Option<Comment>> {
        let mut inner = self.inner.write().await;
        Ok(inner.comments.get_mut(&id).map(|comment| {
            comment.message = message.to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.comments.remove(&id).is_some())
    }
}
