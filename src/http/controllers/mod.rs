use actix_web::web;

pub mod comments;
pub mod likes;
pub mod posts;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    users::configure(cfg);
    posts::configure(cfg);
    comments::configure(cfg);
}
