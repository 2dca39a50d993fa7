//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use blog_infra::auth::JwtConfig;
use blog_infra::database::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Login throttling settings.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// Mark the session cookie `Secure` (HTTPS deployments).
    pub secure_cookies: bool,
    pub rate_limit: RateLimitSettings,
    pub telemetry: TelemetryConfig,
    pub production: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        let database = lookup("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: parsed::<u32>(&lookup, "DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parsed::<u32>(&lookup, "DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let jwt_defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").unwrap_or(jwt_defaults.secret),
            expiration_hours: parsed::<i64>(&lookup, "JWT_EXPIRATION_HOURS")
                .unwrap_or(jwt_defaults.expiration_hours),
            issuer: lookup("JWT_ISSUER").unwrap_or(jwt_defaults.issuer),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed::<u16>(&lookup, "PORT").unwrap_or(8080),
            database,
            jwt,
            secure_cookies: flag("SECURE_COOKIES"),
            rate_limit: RateLimitSettings {
                max_requests: parsed::<u32>(&lookup, "RATE_LIMIT_MAX_REQUESTS").unwrap_or(30),
                window: Duration::from_secs(
                    parsed::<u64>(&lookup, "RATE_LIMIT_WINDOW_SECS").unwrap_or(60),
                ),
            },
            telemetry: TelemetryConfig {
                json_logs: lookup("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
                service_name: lookup("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|| "blog-server".to_string()),
            },
            production: lookup("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false),
        }
    }

    /// Log configuration problems that should not stop startup.
    pub fn warn_on_insecure_defaults(&self) {
        if !self.jwt.uses_default_secret() {
            return;
        }
        if self.production {
            tracing::error!(
                "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
            );
        } else {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }
    }
}

/// Parse `key` as `T`; absent or malformed values yield `None`.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse().ok())
}
