use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::http::{Actor, Error};
use crate::schema::Follow;
use crate::types::id::UserId;
use crate::types::Pager;
use crate::App;

#[tracing::instrument(skip(actor))]
pub async fn post(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<UserId>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let target_id = path.into_inner();

    let mut conn = app.db_write().await?;
    Follow::create(&mut *conn, user.id, target_id).await?;

    tracing::info!("user {} followed user {target_id}", user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Followed user successfully" })))
}

#[tracing::instrument(skip(actor))]
pub async fn delete(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<UserId>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let target_id = path.into_inner();

    let mut conn = app.db_write().await?;
    Follow::remove(&mut *conn, user.id, target_id).await?;

    tracing::info!("user {} unfollowed user {target_id}", user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Unfollowed user successfully" })))
}

#[tracing::instrument(skip(actor))]
pub async fn get_following(
    app: web::Data<App>,
    actor: Actor,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;

    let mut conn = app.db_read().await?;
    let following =
        Follow::list_following(&mut *conn, user.id, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "following": following,
        "pagination": pager.block(&following),
    })))
}

#[tracing::instrument(skip(actor))]
pub async fn get_followers(
    app: web::Data<App>,
    actor: Actor,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;

    let mut conn = app.db_read().await?;
    let followers =
        Follow::list_followers(&mut *conn, user.id, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "followers": followers,
        "pagination": pager.block(&followers),
    })))
}

#[tracing::instrument(skip(actor))]
pub async fn get_stats(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;

    let mut conn = app.db_read().await?;
    let stats = Follow::counts(&mut *conn, user.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "stats": stats })))
}
