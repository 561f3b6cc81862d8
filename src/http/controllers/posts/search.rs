use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::http::Error;
use crate::schema::Post;
use crate::types::Pager;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub q: String,
}

/// Substring search over post content; the empty query is a plain
/// recency-ordered listing.
#[tracing::instrument]
pub async fn get(
    app: web::Data<App>,
    query: web::Query<Query>,
    pager: web::Query<Pager>,
) -> Result<HttpResponse, Error> {
    let mut conn = app.db_read().await?;
    let posts = Post::search(&mut *conn, &query.q, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pager.block(&posts),
    })))
}
