//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        // Account routes
        .route("/signup", web::post().to(auth::signup))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::post().to(auth::logout))
        .route("/profile", web::get().to(auth::profile))
        .route("/changePassword", web::post().to(auth::change_password))
        .route("/profile/update-avatar", web::put().to(auth::update_avatar))
        // Post routes
        .route("/createPost", web::post().to(posts::create_post))
        .route("/posts", web::get().to(posts::feed))
        .route("/posts/{post_id}", web::get().to(posts::get_post))
        .route("/posts/{post_id}", web::put().to(posts::update_post))
        .route("/posts/{post_id}", web::delete().to(posts::delete_post))
        .route("/user/{user_id}/my-posts", web::get().to(posts::my_posts))
        // Comment routes
        .route(
            "/posts/{post_id}/comments",
            web::post().to(comments::create_comment),
        )
        .route(
            "/user/{user_id}/my-comments",
            web::get().to(comments::my_comments),
        );
}
