use chrono::NaiveDateTime;
use error_stack::{Report, ResultExt};
use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;

use crate::database::{Connection, ErrorExt, Result};
use crate::types::id::{CommentId, PostId, UserId};

#[derive(Debug, FromRow, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// A comment joined with its author's summary, served by the
/// per-post listing.
#[derive(Debug, FromRow, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub username: String,
    pub full_name: String,
}

/// Mutations are owner-scoped, and the boundary must tell "absent"
/// apart from "not yours" (404 vs 403), so writes are preceded by an
/// existence read and report which gate failed.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("comment does not exist")]
    NotFound,
    #[error("comment belongs to another user")]
    NotOwner,
    #[error("could not write comment")]
    Database,
}

impl Comment {
    #[tracing::instrument(skip_all, name = "db.comments.create")]
    pub async fn create(
        conn: &mut Connection,
        post_id: PostId,
        author_id: UserId,
        content: &str,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "comments" (post_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING *"#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(id), name = "db.comments.by_id")]
    pub async fn by_id(conn: &mut Connection, id: CommentId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "comments" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.comments.update")]
    pub async fn update(
        conn: &mut Connection,
        id: CommentId,
        author_id: UserId,
        content: &str,
    ) -> error_stack::Result<Self, WriteError> {
        Self::check_owner(&mut *conn, id, author_id).await?;

        let updated = sqlx::query_as::<_, Self>(
            r#"UPDATE "comments"
            SET content = $1, updated_at = now()
            WHERE id = $2 AND author_id = $3
            RETURNING *"#,
        )
        .bind(content)
        .bind(id)
        .bind(author_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
        .change_context(WriteError::Database)?;

        // the row vanished between the read and the write
        updated.ok_or_else(|| Report::new(WriteError::NotFound))
    }

    #[tracing::instrument(skip_all, name = "db.comments.remove")]
    pub async fn remove(
        conn: &mut Connection,
        id: CommentId,
        author_id: UserId,
    ) -> error_stack::Result<bool, WriteError> {
        Self::check_owner(&mut *conn, id, author_id).await?;

        let result = sqlx::query(r#"DELETE FROM "comments" WHERE id = $1 AND author_id = $2"#)
            .bind(id)
            .bind(author_id)
            .execute(conn)
            .await
            .into_db_error()
            .change_context(WriteError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Comments on a post in chronological thread order (oldest first,
    /// unlike the feed).
    #[tracing::instrument(skip(post_id), name = "db.comments.list_for_post")]
    pub async fn list_for_post(
        conn: &mut Connection,
        post_id: PostId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentView>> {
        sqlx::query_as::<_, CommentView>(
            r#"SELECT c.id, c.post_id, c.author_id, c.content, c.created_at, c.updated_at,
                u.username, u.full_name
            FROM "comments" c
            JOIN "users" u ON c.author_id = u.id
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            LIMIT $2 OFFSET $3"#,
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    async fn check_owner(
        conn: &mut Connection,
        id: CommentId,
        author_id: UserId,
    ) -> error_stack::Result<(), WriteError> {
        let existing = Self::by_id(conn, id)
            .await
            .change_context(WriteError::Database)?;

        match existing {
            None => Err(Report::new(WriteError::NotFound)),
            Some(comment) if comment.author_id != author_id => {
                Err(Report::new(WriteError::NotOwner))
            }
            Some(..) => Ok(()),
        }
    }
}
