use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::http::{Actor, Error};
use crate::schema::post::NewPost;
use crate::schema::Post;
use crate::types::form::posts::publish;
use crate::App;

#[tracing::instrument(skip(actor, form))]
pub async fn post(
    app: web::Data<App>,
    actor: Actor,
    form: web::Json<publish::Request>,
) -> Result<HttpResponse, Error> {
    let user = actor.get_user()?;
    form.validate()?;

    let mut conn = app.db_write().await?;
    let post = Post::create(
        &mut *conn,
        NewPost {
            author_id: user.id,
            content: &form.content,
            media_url: form.media_url.as_deref(),
            comments_enabled: form.comments_enabled,
        },
    )
    .await?;

    tracing::info!("user {} created post {}", user.id, post.id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Post created successfully",
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
