//! Postgres store backend. One table per collection; a post carries its
//! comment references as a `UUID[]` column, mirroring the document shape.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::models::{Comment, Post, User};

use super::{profile_from_columns, NewComment, NewPost, PostPatch, Store, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        bio TEXT,
        avatar TEXT,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        tags TEXT[] NOT NULL,
        author UUID NOT NULL,
        comment_ids UUID[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id UUID PRIMARY KEY,
        message TEXT NOT NULL,
        author UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
];

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and ensure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        profile: profile_from_columns(row.try_get("bio")?, row.try_get("avatar")?),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        tags: row.try_get("tags")?,
        author: row.try_get("author")?,
        comment_ids: row.try_get("comment_ids")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn comment_from_row(row: &PgRow) -> Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        message: row.try_get("message")?,
        author: row.try_get("author")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let row = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password_hash, bio, avatar, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row)?)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, bio, avatar, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, bio, avatar, created_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    async fn set_bio(&self, id: Uuid, bio: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "UPDATE users SET bio = $2 WHERE id = $1
             RETURNING id, username, password_hash, bio, avatar, created_at",
        )
        .bind(id)
        .bind(bio)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    async fn set_avatar(&self, id: Uuid, avatar_url: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "UPDATE users SET avatar = $2 WHERE id = $1
             RETURNING id, username, password_hash, bio, avatar, created_at",
        )
        .bind(id)
        .bind(avatar_url)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    async fn create_post(&self, new: NewPost) -> StoreResult<Post> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO posts (id, title, body, tags, author, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING id, title, body, tags, author, comment_ids, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.body)
        .bind(&new.tags)
        .bind(new.author)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(post_from_row(&row)?)
    }

    async fn find_post(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, title, body, tags, author, comment_ids, created_at, updated_at
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(post_from_row).transpose().map_err(Into::into)
    }

    async fn find_posts_newest_first(&self) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, title, body, tags, author, comment_ids, created_at, updated_at
             FROM posts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(post_from_row).collect::<Result<_, _>>().map_err(Into::into)
    }

    async fn posts_by_author(&self, author: Uuid) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, title, body, tags, author, comment_ids, created_at, updated_at
             FROM posts WHERE author = $1 ORDER BY created_at DESC",
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(post_from_row).collect::<Result<_, _>>().map_err(Into::into)
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> StoreResult<Option<Post>> {
        let row = sqlx::query(
            "UPDATE posts SET title = $2, body = $3, tags = $4, updated_at = $5
             WHERE id = $1
             RETURNING id, title, body, tags, author, comment_ids, created_at, updated_at",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.body)
        .bind(&patch.tags)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(post_from_row).transpose().map_err(Into::into)
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_comment_ref(&self, post_id: Uuid, comment_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            "UPDATE posts SET comment_ids = array_append(comment_ids, $2), updated_at = $3
             WHERE id = $1",
        )
        .bind(post_id)
        .bind(comment_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_comment(&self, new: NewComment) -> StoreResult<Comment> {
        let now = Utc::now();
        let row = sqlx::query(
            "INSERT INTO comments (id, message, author, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)
             RETURNING id, message, author, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new.message)
        .bind(new.author)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment_from_row(&row)?)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let row = sqlx::query(
            "SELECT id, message, author, created_at, updated_at
             FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(comment_from_row).transpose().map_err(Into::into)
    }

    async fn update_comment(&self, id: Uuid, message: &str) -> StoreResult<Option<Comment>> {
        let row = sqlx::query(
            "UPDATE comments SET message = $2, updated_at = $3 WHERE id = $1
             RETURNING id, message, author, created_at, updated_at",
        )
        .bind(id)
        .bind(message)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(comment_from_row).transpose().map_err(Into::into)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
