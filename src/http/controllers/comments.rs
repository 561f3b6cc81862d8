use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::http::{Actor, Error};
use crate::schema::Comment;
use crate::types::form::comments::write;
use crate::types::id::{CommentId, PostId};
use crate::types::Pager;
use crate::App;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .route("/{comment_id}", web::patch().to(patch))
            .route("/{comment_id}", web::delete().to(delete)),
    );
}

#[tracing::instrument(skip(actor, form))]
pub async fn post(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PostId>,
    form: web::Json<write::Request>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    form.validate()?;

    let post_id = path.into_inner();
    let mut conn = app.db_write().await?;
    let comment = Comment::create(&mut *conn, post_id, user.id, &form.content).await?;

    tracing::info!("user {} created comment {} on post {post_id}", user.id, comment.id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Comment created successfully",
        "comment": comment,
    })))
}

#[tracing::instrument(skip(actor, form))]
pub async fn patch(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<CommentId>,
    form: web::Json<write::Request>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    form.validate()?;

    let comment_id = path.into_inner();
    let mut conn = app.db_write().await?;
    let comment = Comment::update(&mut *conn, comment_id, user.id, &form.content).await?;

    tracing::info!("user {} updated comment {comment_id}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Comment updated successfully",
        "comment": comment,
    })))
}

#[tracing::instrument(skip(actor))]
pub async fn delete(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<CommentId>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;

    let comment_id = path.into_inner();
    let mut conn = app.db_write().await?;
    Comment::remove(&mut *conn, comment_id, user.id).await?;

    tracing::info!("user {} deleted comment {comment_id}", user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Comment deleted successfully" })))
}

/// Comments for a post in thread order (oldest first).
#[tracing::instrument]
pub async fn get_for_post(
    app: web::Data<App>,
    path: web::Path<PostId>,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let mut conn = app.db_read().await?;
    let comments =
        Comment::list_for_post(&mut *conn, path.into_inner(), pager.limit(), pager.offset())
            .await?;

    Ok(HttpResponse::Ok().json(json!({
        "comments": comments,
        "pagination": pager.block(&comments),
    })))
}
