use actix_web::web;

pub mod follows;
pub mod login;
pub mod me;
pub mod register;
pub mod search;

use super::likes;
use super::posts;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/register", web::post().to(register::post))
            .route("/login", web::post().to(login::post))
            // fixed segments must be registered ahead of `{user_id}`
            .route("/me", web::get().to(me::get))
            .route("/me", web::patch().to(me::patch))
            .route("/me/following", web::get().to(follows::get_following))
            .route("/me/followers", web::get().to(follows::get_followers))
            .route("/me/stats", web::get().to(follows::get_stats))
            .route("/search", web::get().to(search::get))
            .route("/{user_id}/follow", web::post().to(follows::post))
            .route("/{user_id}/follow", web::delete().to(follows::delete))
            .route("/{user_id}/posts", web::get().to(posts::fetch::by_user))
            .route("/{user_id}/likes", web::get().to(likes::get_user_likes)),
    );
}
