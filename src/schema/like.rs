use chrono::NaiveDateTime;
use error_stack::{Report, ResultExt};
use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;

use crate::database::{Connection, ErrorExt, Result};
use crate::types::id::{PostId, UserId};

/// An edge between a user and a post they liked.
#[derive(Debug, FromRow, PartialEq, Eq, Serialize)]
pub struct Like {
    pub user_id: UserId,
    pub post_id: PostId,
    pub created_at: NaiveDateTime,
}

/// One like on a post, carrying who liked it and when.
#[derive(Debug, FromRow, PartialEq, Eq, Serialize)]
pub struct PostLike {
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
    pub created_at: NaiveDateTime,
}

/// A post annotated with the timestamp the user liked it.
#[derive(Debug, FromRow, PartialEq, Eq, Serialize)]
pub struct LikedPost {
    pub id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub media_url: Option<String>,
    pub comments_enabled: bool,
    pub created_at: NaiveDateTime,
    pub liked_at: NaiveDateTime,
}

#[derive(Debug, Error)]
pub enum LikeError {
    #[error("post is already liked by this user")]
    AlreadyLiked,
    #[error("could not update the like relation")]
    Database,
}

impl Like {
    /// Inserts the edge, failing when it already exists.
    ///
    /// The existence check below is not atomic against a concurrent
    /// identical request; the edge's primary key is. An insert that
    /// conflicts after the check passed returns no row, and that empty
    /// `RETURNING` is treated as the authoritative duplicate signal.
    #[tracing::instrument(skip_all, name = "db.likes.create")]
    pub async fn create(
        conn: &mut Connection,
        user_id: UserId,
        post_id: PostId,
    ) -> error_stack::Result<Self, LikeError> {
        let exists = Self::exists(&mut *conn, user_id, post_id)
            .await
            .change_context(LikeError::Database)
            .attach_printable("could not check if the user has already liked the post")?;

        if exists {
            return Err(Report::new(LikeError::AlreadyLiked));
        }

        let inserted = sqlx::query_as::<_, Self>(
            r#"INSERT INTO "likes" (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            RETURNING *"#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
        .change_context(LikeError::Database)?;

        match inserted {
            Some(like) => Ok(like),
            // lost the race against an identical request
            None => Err(Report::new(LikeError::AlreadyLiked)),
        }
    }

    /// Removes the edge if present; absence is not an error.
    #[tracing::instrument(skip_all, name = "db.likes.remove")]
    pub async fn remove(
        conn: &mut Connection,
        user_id: UserId,
        post_id: PostId,
    ) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM "likes" WHERE user_id = $1 AND post_id = $2"#)
            .bind(user_id)
            .bind(post_id)
            .execute(conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "db.likes.exists")]
    pub async fn exists(conn: &mut Connection, user_id: UserId, post_id: PostId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM "likes" WHERE user_id = $1 AND post_id = $2)"#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Who liked the post, oldest like first.
    #[tracing::instrument(skip(post_id), name = "db.likes.list_for_post")]
    pub async fn list_for_post(conn: &mut Connection, post_id: PostId) -> Result<Vec<PostLike>> {
        sqlx::query_as::<_, PostLike>(
            r#"SELECT l.user_id, u.username, u.full_name, l.created_at
            FROM "likes" l
            JOIN "users" u ON l.user_id = u.id
            WHERE l.post_id = $1
            ORDER BY l.created_at ASC, l.user_id ASC"#,
        )
        .bind(post_id)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    /// Posts the user liked, most recently liked first. Tombstoned
    /// posts stay out of the listing.
    #[tracing::instrument(skip(user_id), name = "db.likes.list_posts_liked_by")]
    pub async fn list_posts_liked_by(
        conn: &mut Connection,
        user_id: UserId,
    ) -> Result<Vec<LikedPost>> {
        sqlx::query_as::<_, LikedPost>(
            r#"SELECT p.id, p.author_id, p.content, p.media_url, p.comments_enabled,
                p.created_at, l.created_at AS liked_at
            FROM "likes" l
            JOIN "posts" p ON l.post_id = p.id
            WHERE l.user_id = $1 AND p.is_deleted = false
            ORDER BY l.created_at DESC, p.id DESC"#,
        )
        .bind(user_id)
        .fetch_all(conn)
        .await
        .into_db_error()
    }
}
