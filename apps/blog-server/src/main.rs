//! # Blog Server
//!
//! The Actix-web HTTP server for the blog: post listings, detail pages,
//! authoring forms and session authentication.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);
    config.warn_on_insecure_defaults();

    tracing::info!("Starting Blog Server on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await;

    #[cfg(feature = "rate-limit")]
    let limiter = {
        use blog_core::ports::RateLimiter;
        use blog_infra::{InMemoryRateLimiter, RateLimitConfig};
        use std::sync::Arc;

        let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: config.rate_limit.max_requests,
            window: config.rate_limit.window,
        }));
        web::Data::new(limiter)
    };

    HttpServer::new(move || {
        let app = App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()));

        #[cfg(feature = "rate-limit")]
        let app = app.app_data(limiter.clone());

        app.configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
