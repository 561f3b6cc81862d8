use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::{Connection, ErrorExt, Result};
use crate::types::id::{PostId, UserId};

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub media_url: Option<String>,
    pub comments_enabled: bool,
    pub created_at: NaiveDateTime,
    pub is_deleted: bool,
}

/// A post joined with its author's summary, the shape every listing
/// and feed endpoint serves. Tombstoned posts never appear as views.
#[derive(Debug, FromRow, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub media_url: Option<String>,
    pub comments_enabled: bool,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug)]
pub struct NewPost<'a> {
    pub author_id: UserId,
    pub content: &'a str,
    pub media_url: Option<&'a str>,
    pub comments_enabled: bool,
}

/// Partial post edit; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UpdatePost<'a> {
    pub content: Option<&'a str>,
    pub media_url: Option<&'a str>,
    pub comments_enabled: Option<bool>,
}

const POST_VIEW_COLUMNS: &str = r#"p.id, p.author_id, p.content, p.media_url,
    p.comments_enabled, p.created_at, u.username, u.full_name"#;

impl Post {
    #[tracing::instrument(skip_all, name = "db.posts.create")]
    pub async fn create(conn: &mut Connection, post: NewPost<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "posts" (author_id, content, media_url, comments_enabled)
            VALUES ($1, $2, $3, $4)
            RETURNING *"#,
        )
        .bind(post.author_id)
        .bind(post.content)
        .bind(post.media_url)
        .bind(post.comments_enabled)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Finds a post by id; tombstoned rows are treated as absent.
    #[tracing::instrument(skip(id), name = "db.posts.by_id")]
    pub async fn by_id(conn: &mut Connection, id: PostId) -> Result<Option<PostView>> {
        sqlx::query_as::<_, PostView>(&format!(
            r#"SELECT {POST_VIEW_COLUMNS}
            FROM "posts" p
            JOIN "users" u ON p.author_id = u.id
            WHERE p.id = $1 AND p.is_deleted = false"#,
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(author_id), name = "db.posts.list_by_author")]
    pub async fn list_by_author(
        conn: &mut Connection,
        author_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>> {
        sqlx::query_as::<_, PostView>(&format!(
            r#"SELECT {POST_VIEW_COLUMNS}
            FROM "posts" p
            JOIN "users" u ON p.author_id = u.id
            WHERE p.author_id = $1 AND p.is_deleted = false
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3"#,
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    /// The feed: non-deleted posts authored by anyone the user
    /// follows, newest first. A membership join against the follow
    /// graph; no ranking.
    #[tracing::instrument(skip(user_id), name = "db.posts.list_feed")]
    pub async fn list_feed(
        conn: &mut Connection,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>> {
        sqlx::query_as::<_, PostView>(&format!(
            r#"SELECT {POST_VIEW_COLUMNS}
            FROM "posts" p
            JOIN "users" u ON p.author_id = u.id
            WHERE p.author_id IN (
                SELECT following_id FROM "follows" WHERE follower_id = $1
            )
            AND p.is_deleted = false
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3"#,
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    /// Case-insensitive substring search over post content; the empty
    /// query matches everything. Plain recency order, no relevance
    /// ranking.
    #[tracing::instrument(skip(query), name = "db.posts.search")]
    pub async fn search(
        conn: &mut Connection,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>> {
        sqlx::query_as::<_, PostView>(&format!(
            r#"SELECT {POST_VIEW_COLUMNS}
            FROM "posts" p
            JOIN "users" u ON p.author_id = u.id
            WHERE p.content ILIKE $1 AND p.is_deleted = false
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3"#,
        ))
        .bind(super::contains_pattern(query))
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    /// Applies a partial edit, gated on ownership and liveness in the
    /// same statement. `None` means the post is absent, tombstoned or
    /// owned by someone else; callers collapse those into one 404.
    #[tracing::instrument(skip_all, name = "db.posts.update")]
    pub async fn update(
        conn: &mut Connection,
        id: PostId,
        author_id: UserId,
        update: UpdatePost<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "posts"
            SET content = COALESCE($1, content),
                media_url = COALESCE($2, media_url),
                comments_enabled = COALESCE($3, comments_enabled)
            WHERE id = $4 AND author_id = $5 AND is_deleted = false
            RETURNING *"#,
        )
        .bind(update.content)
        .bind(update.media_url)
        .bind(update.comments_enabled)
        .bind(id)
        .bind(author_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Sets the tombstone flag. The row persists; every read path
    /// filters it out from now on.
    #[tracing::instrument(skip_all, name = "db.posts.soft_delete")]
    pub async fn soft_delete(conn: &mut Connection, id: PostId, author_id: UserId) -> Result<bool> {
        let result = sqlx::query(
            r#"UPDATE "posts" SET is_deleted = true
            WHERE id = $1 AND author_id = $2 AND is_deleted = false"#,
        )
        .bind(id)
        .bind(author_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }
}
