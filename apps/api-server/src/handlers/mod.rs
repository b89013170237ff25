//! HTTP handlers and route configuration.

mod auth;
mod communities;
mod health;
mod posts;
mod profiles;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Community routes
            .service(
                web::scope("/communities")
                    .route("", web::get().to(communities::list))
                    .route("", web::post().to(communities::create))
                    .route("/search", web::get().to(communities::search))
                    .route("/joined", web::get().to(communities::joined))
                    .route("/{id}", web::get().to(communities::get))
                    .route("/{id}/join", web::post().to(communities::join))
                    .route("/{id}/leave", web::post().to(communities::leave))
                    .route("/{id}/members", web::get().to(communities::members))
                    .route("/{id}/posts", web::get().to(communities::list_posts))
                    .route("/{id}/posts", web::post().to(communities::create_post)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("/search", web::get().to(posts::search))
                    .route("/feed", web::get().to(posts::feed))
                    .route("/bookmarked", web::get().to(posts::bookmarked))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/like", web::post().to(posts::toggle_like))
                    .route("/{id}/bookmark", web::post().to(posts::toggle_bookmark))
                    .route("/{id}/report", web::post().to(posts::report))
                    .route("/{id}/likes", web::get().to(posts::likes))
                    .route("/{id}/stats", web::get().to(posts::stats))
                    .route("/{id}/comments", web::get().to(posts::list_comments))
                    .route("/{id}/comments", web::post().to(posts::create_comment))
                    .route(
                        "/{id}/comments/{comment_id}",
                        web::delete().to(posts::delete_comment),
                    ),
            )
            // Profile routes
            .service(
                web::scope("/profile")
                    .route("/me", web::get().to(profiles::me))
                    .route("/me", web::put().to(profiles::update_me))
                    .route("/{user_id}", web::get().to(profiles::get)),
            ),
    );
}
