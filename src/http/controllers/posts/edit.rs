use actix_web::{web, HttpResponse};
use serde_json::json;
use thiserror::Error;
use validator::Validate;

use crate::http::{Actor, Error};
use crate::schema::post::UpdatePost;
use crate::schema::Post;
use crate::types;
use crate::types::id::PostId;
use crate::App;

#[tracing::instrument(skip(actor, form))]
pub async fn patch(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<PostId>,
    form: web::Json<types::form::posts::edit::Request>,
) -> Result<HttpResponse, Error> {
    // "absent", "tombstoned" and "not yours" are deliberately
    // indistinguishable to the caller
    #[derive(Debug, Error)]
    #[error("Post not found or not owned by this user")]
    struct ResourceError;

    let user = actor.get_user()?;
    form.validate()?;

    let post_id = path.into_inner();
    let mut conn = app.db_write().await?;
    let updated = Post::update(
        &mut *conn,
        post_id,
        user.id,
        UpdatePost {
            content: form.content.as_deref(),
            media_url: form.media_url.as_deref(),
            comments_enabled: form.comments_enabled,
        },
    )
    .await?;

    let Some(post) = updated else {
        return Err(Error::from_context(types::Error::NotFound, ResourceError));
    };

    tracing::info!("user {} updated post {post_id}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Post updated successfully",
        "post": {
            "id": post.id,
            "author_id": post.author_id,
            "content": post.content,
            "media_url": post.media_url,
            "comments_enabled": post.comments_enabled,
            "created_at": post.created_at,
        },
    })))
}
