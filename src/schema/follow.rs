use chrono::NaiveDateTime;
use error_stack::{Report, ResultExt};
use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;

use crate::database::{Connection, ErrorExt, Result};
use crate::types::id::UserId;

use super::user::UserSummary;

/// A directed edge in the follow graph.
#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct Follow {
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct FollowCounts {
    pub following_count: i64,
    pub follower_count: i64,
}

#[derive(Debug, Error)]
pub enum FollowError {
    #[error("users cannot follow themselves")]
    SelfFollow,
    #[error("could not update the follow graph")]
    Database,
}

impl Follow {
    /// Inserts the edge if absent. Repeated calls are silent no-ops;
    /// the edge's primary key resolves racing duplicate inserts.
    #[tracing::instrument(skip_all, name = "db.follows.create")]
    pub async fn create(
        conn: &mut Connection,
        follower_id: UserId,
        following_id: UserId,
    ) -> error_stack::Result<(), FollowError> {
        // Rejected before touching the store at all.
        if follower_id == following_id {
            return Err(Report::new(FollowError::SelfFollow));
        }

        sqlx::query(
            r#"INSERT INTO "follows" (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING"#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(conn)
        .await
        .into_db_error()
        .change_context(FollowError::Database)?;

        Ok(())
    }

    /// Removes the edge if present, reporting whether a removal occurred.
    #[tracing::instrument(skip_all, name = "db.follows.remove")]
    pub async fn remove(
        conn: &mut Connection,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"DELETE FROM "follows" WHERE follower_id = $1 AND following_id = $2"#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    /// Accounts the user follows, ordered by username.
    #[tracing::instrument(skip(user_id), name = "db.follows.list_following")]
    pub async fn list_following(
        conn: &mut Connection,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>> {
        sqlx::query_as::<_, UserSummary>(
            r#"SELECT u.id, u.username, u.full_name
            FROM "follows" f
            JOIN "users" u ON f.following_id = u.id
            WHERE f.follower_id = $1
            ORDER BY u.username
            LIMIT $2 OFFSET $3"#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    /// Accounts following the user, ordered by username.
    #[tracing::instrument(skip(user_id), name = "db.follows.list_followers")]
    pub async fn list_followers(
        conn: &mut Connection,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>> {
        sqlx::query_as::<_, UserSummary>(
            r#"SELECT u.id, u.username, u.full_name
            FROM "follows" f
            JOIN "users" u ON f.follower_id = u.id
            WHERE f.following_id = $1
            ORDER BY u.username
            LIMIT $2 OFFSET $3"#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(user_id), name = "db.follows.counts")]
    pub async fn counts(conn: &mut Connection, user_id: UserId) -> Result<FollowCounts> {
        let following_count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "follows" WHERE follower_id = $1"#)
                .bind(user_id)
                .fetch_one(&mut *conn)
                .await
                .into_db_error()?;

        let follower_count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "follows" WHERE following_id = $1"#)
                .bind(user_id)
                .fetch_one(conn)
                .await
                .into_db_error()?;

        Ok(FollowCounts { following_count, follower_count })
    }
}
