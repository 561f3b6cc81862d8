use actix_web::web;

pub mod edit;
pub mod feed;
pub mod fetch;
pub mod publish;
pub mod remove;
pub mod search;

use super::comments;
use super::likes;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/posts")
            .route("", web::post().to(publish::post))
            // fixed segments must be registered ahead of `{post_id}`
            .route("/feed", web::get().to(feed::get))
            .route("/search", web::get().to(search::get))
            .route("/me", web::get().to(fetch::mine))
            .route("/{post_id}", web::get().to(fetch::get))
            .route("/{post_id}", web::patch().to(edit::patch))
            .route("/{post_id}", web::delete().to(remove::delete))
            .route("/{post_id}/likes", web::post().to(likes::post))
            .route("/{post_id}/likes", web::delete().to(likes::delete))
            .route("/{post_id}/likes", web::get().to(likes::get_for_post))
            .route("/{post_id}/comments", web::post().to(comments::post))
            .route("/{post_id}/comments", web::get().to(comments::get_for_post)),
    );
}
