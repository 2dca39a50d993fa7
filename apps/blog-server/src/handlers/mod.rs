//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod views;


use actix_web::{HttpRequest, HttpResponse, http::header, web};
use blog_shared::ErrorResponse;
use uuid::Uuid;

use crate::observability::RequestId;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route("/create/", web::get().to(posts::create_form))
        .route("/create/", web::post().to(posts::create_submit))
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .route("/posts/{post_id}/edit/", web::get().to(posts::edit_form))
        .route("/posts/{post_id}/edit/", web::post().to(posts::edit_submit));

    #[cfg(feature = "rate-limit")]
    cfg.service(
        auth_routes(web::scope("/auth")).wrap(crate::middleware::rate_limit::RateLimitMiddleware),
    );
    #[cfg(not(feature = "rate-limit"))]
    cfg.service(auth_routes(web::scope("/auth")));

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/auth/token", web::post().to(auth::token)),
    )
    .default_service(web::to(not_found));
}

fn auth_routes(scope: actix_web::Scope) -> actix_web::Scope {
    scope
        .route("/signup/", web::get().to(auth::signup_form))
        .route("/signup/", web::post().to(auth::signup))
        .route("/login/", web::get().to(auth::login_form))
        .route("/login/", web::post().to(auth::login))
        .route("/logout/", web::get().to(auth::logout))
}

async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    tracing::debug!(request_id = request_id.as_str(), path = req.path(), "No route matched");
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("No route matches this path").with_instance(req.path()),
    )
}

/// `302 Found` pointing at `location`.
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Send an anonymous client to the login page, returning here afterwards.
pub(crate) fn login_redirect(req: &HttpRequest) -> HttpResponse {
    found(&format!("/auth/login/?next={}", req.path()))
}

pub(crate) fn profile_path(username: &str) -> String {
    format!("/profile/{}/", username)
}

pub(crate) fn post_path(id: Uuid) -> String {
    format!("/posts/{}/", id)
}
