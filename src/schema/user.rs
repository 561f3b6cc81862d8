use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::{Connection, ErrorExt, Result};
use crate::types::id::UserId;

#[derive(Debug, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub created_at: NaiveDateTime,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub updated_at: Option<NaiveDateTime>,
}

/// The public face of a user row, embedded in listings
/// (followers, likes, search results).
#[derive(Debug, Clone, FromRow, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
}

/// A profile joined with its follow counts; both counts come from the
/// same statement so they are consistent with each other per query.
#[derive(Debug, FromRow, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: NaiveDateTime,
    pub follower_count: i64,
    pub following_count: i64,
}

#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UpdateUser<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

impl User {
    #[tracing::instrument(skip_all, name = "db.users.create")]
    pub async fn create(conn: &mut Connection, user: NewUser<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "users" (username, email, password_hash, full_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *"#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.full_name)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(id), name = "db.users.by_id")]
    pub async fn by_id(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(condition), fields(condition = "<hidden>"), name = "db.users.by_username")]
    pub async fn by_username(conn: &mut Connection, condition: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE username = $1"#)
            .bind(condition)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(condition), fields(condition = "<hidden>"), name = "db.users.by_email")]
    pub async fn by_email(conn: &mut Connection, condition: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE email = $1"#)
            .bind(condition)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(condition), fields(condition = "<hidden>"), name = "db.users.by_username_or_email")]
    pub async fn by_username_or_email(
        conn: &mut Connection,
        condition: &str,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE username = $1 OR email = $1"#)
            .bind(condition)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    /// Case-insensitive substring search over usernames and full
    /// names, ordered by username.
    #[tracing::instrument(skip(query), name = "db.users.search_by_name")]
    pub async fn search_by_name(
        conn: &mut Connection,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserSummary>> {
        sqlx::query_as::<_, UserSummary>(
            r#"SELECT id, username, full_name FROM "users"
            WHERE username ILIKE $1 OR full_name ILIKE $1
            ORDER BY username
            LIMIT $2 OFFSET $3"#,
        )
        .bind(super::contains_pattern(query))
        .bind(limit)
        .bind(offset)
        .fetch_all(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(id), name = "db.users.profile")]
    pub async fn profile(conn: &mut Connection, id: UserId) -> Result<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            r#"SELECT
                u.id, u.username, u.email, u.full_name, u.created_at,
                (SELECT COUNT(*) FROM "follows" WHERE following_id = u.id) AS follower_count,
                (SELECT COUNT(*) FROM "follows" WHERE follower_id = u.id) AS following_count
            FROM "users" u
            WHERE u.id = $1"#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip_all, name = "db.users.update_profile")]
    pub async fn update_profile(
        conn: &mut Connection,
        id: UserId,
        update: UpdateUser<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE "users"
            SET username = COALESCE($1, username),
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                password_hash = COALESCE($4, password_hash),
                updated_at = now()
            WHERE id = $5
            RETURNING *"#,
        )
        .bind(update.username)
        .bind(update.email)
        .bind(update.full_name)
        .bind(update.password_hash)
        .bind(id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }
}
