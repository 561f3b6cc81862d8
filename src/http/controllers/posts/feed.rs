use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::http::{Actor, Error};
use crate::schema::Post;
use crate::types::Pager;
use crate::App;

/// The chronological feed: posts from accounts the caller follows.
#[tracing::instrument(skip(actor))]
pub async fn get(
    app: web::Data<App>,
    actor: Actor,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;

    let mut conn = app.db_read().await?;
    let posts = Post::list_feed(&mut *conn, user.id, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pager.block(&posts),
    })))
}
