use actix_web::{web, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::Validate;

use crate::http::{Actor, Error};
use crate::schema::user::UpdateUser;
use crate::schema::User;
use crate::types::{self, form::users::update_profile};
use crate::{auth, App};

#[tracing::instrument(skip(actor))]
pub async fn get(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    #[derive(Debug, Error)]
    #[error("User profile not found")]
    struct ResourceError;

    let user = actor.get_user()?;

    let mut conn = app.db_read().await?;
    let Some(profile) = User::profile(&mut *conn, user.id).await? else {
        return Err(Error::from_context(types::Error::NotFound, ResourceError));
    };

    Ok(HttpResponse::Ok().json(json!({ "profile": profile })))
}

#[tracing::instrument(skip(actor, form))]
pub async fn patch(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<update_profile::Request>,
) -> Result<HttpResponse, Error> {
    #[derive(Debug, Error)]
    #[error("User vanished while updating their profile")]
    struct ResourceError;

    let user = actor.get_user()?;
    form.validate()?;

    let password_hash = match form.password.as_ref() {
        Some(password) => Some(
            auth::hash_password(password.as_str())
                .map_err(|e| Error::from_report(types::Error::Internal, e))?,
        ),
        None => None,
    };

    let mut conn = app.db_write().await?;
    let updated = User::update_profile(
        &mut *conn,
        user.id,
        UpdateUser {
            username: form.username.as_ref().map(|v| v.as_str()),
            email: form.email.as_ref().map(|v| v.as_str()),
            full_name: form.full_name.as_deref(),
            password_hash: password_hash.as_deref(),
        },
    )
    .await?;

    let Some(updated) = updated else {
        return Err(Error::from_context(types::Error::NotFound, ResourceError));
    };

    tracing::info!("user {} updated their profile", updated.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully",
        "user": {
            "id": updated.id,
            "username": updated.username,
            "email": updated.email,
            "full_name": updated.full_name,
            "created_at": updated.created_at,
        },
    })))
}
