use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::http::{Actor, Error};
use crate::schema::Like;
use crate::types::id::{PostId, UserId};
use crate::App;

#[tracing::instrument(skip(actor))]
pub async fn post(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PostId>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let post_id = path.into_inner();

    let mut conn = app.db_write().await?;
    Like::create(&mut *conn, user.id, post_id).await?;

    tracing::info!("user {} liked post {post_id}", user.id);

    Ok(HttpResponse::Created().json(json!({ "message": "Post liked successfully" })))
}

#[tracing::instrument(skip(actor))]
pub async fn delete(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PostId>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    let post_id = path.into_inner();

    let mut conn = app.db_write().await?;
    Like::remove(&mut *conn, user.id, post_id).await?;

    tracing::info!("user {} unliked post {post_id}", user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Post unliked successfully" })))
}

#[tracing::instrument]
pub async fn get_for_post(
    app: web::Data<App>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, Error> {
    let post_id = path.into_inner();

    let mut conn = app.db_read().await?;
    let likes = Like::list_for_post(&mut *conn, post_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "post_id": post_id,
        "likes": likes,
    })))
}

#[tracing::instrument]
pub async fn get_user_likes(
    app: web::Data<App>,
    path: web::Path<UserId>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();

    let mut conn = app.db_read().await?;
    let posts = Like::list_posts_liked_by(&mut *conn, user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "user_id": user_id,
        "posts": posts,
    })))
}
