use actix_web::{web, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::http::{Actor, Error};
use crate::schema::Post;
use crate::types::id::{PostId, UserId};
use crate::types::{self, Pager};
use crate::App;

#[tracing::instrument]
pub async fn get(app: web::Data<App>, path: web::Path<PostId>) -> Result<HttpResponse, Error> {
    #[derive(Debug, Error)]
    #[error("Post not found")]
    struct ResourceError;

    let mut conn = app.db_read().await?;
    let Some(post) = Post::by_id(&mut *conn, path.into_inner()).await? else {
        return Err(Error::from_context(types::Error::NotFound, ResourceError));
    };

    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}

#[tracing::instrument]
pub async fn by_user(
    app: web::Data<App>,
    path: web::Path<UserId>,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let mut conn = app.db_read().await?;
    let posts =
        Post::list_by_author(&mut *conn, path.into_inner(), pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pager.block(&posts),
    })))
}

#[tracing::instrument(skip(actor))]
pub async fn mine(
    app: web::Data<App>,
    actor: Actor,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;

    let mut conn = app.db_read().await?;
    let posts = Post::list_by_author(&mut *conn, user.id, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pager.block(&posts),
    })))
}
