use actix_web::{web, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::http::{Actor, Error};
use crate::schema::Post;
use crate::types;
use crate::types::id::PostId;
use crate::App;

#[tracing::instrument(skip(actor))]
pub async fn delete(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PostId>,
) -> Result<HttpResponse, Error> {
    // "absent", "tombstoned" and "not yours" are deliberately
    // indistinguishable to the caller
    #[derive(Debug, Error)]
    #[error("Post not found or not owned by this user")]
    struct ResourceError;

    let user = actor.get_user()?;
    let post_id = path.into_inner();

    let mut conn = app.db_write().await?;
    let deleted = Post::soft_delete(&mut *conn, post_id, user.id).await?;

    if !deleted {
        return Err(Error::from_context(types::Error::NotFound, ResourceError));
    }

    tracing::info!("user {} deleted post {post_id}", user.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Post deleted successfully" })))
}
