//! CORS middleware configuration for cross-origin requests.
//!
//! The dashboard frontend calls the API with credentials (auth cookies), so
//! every variant supports credentials. Development accepts any origin;
//! staging and production only accept `ALLOWED_ORIGINS`.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use sb_shared::config::{CorsConfig, Environment};

/// Creates a CORS middleware instance configured for the environment.
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_development() && config.allowed_origins.is_empty() {
        create_development_cors(config.max_age)
    } else {
        create_restricted_cors(config)
    }
}

fn allowed_methods() -> Vec<Method> {
    vec![Method::GET, Method::POST, Method::OPTIONS]
}

/// Permissive configuration for local frontends on arbitrary ports.
fn create_development_cors(max_age: usize) -> Cors {
    tracing::info!("Configuring permissive CORS for development");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::CACHE_CONTROL,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(max_age)
        .supports_credentials()
}

/// Only the configured origins may call the API.
fn create_restricted_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age)
        .supports_credentials();

    if config.allowed_origins.is_empty() {
        tracing::warn!("No ALLOWED_ORIGINS configured; cross-origin requests will be rejected");
    }

    for origin in &config.allowed_origins {
        tracing::info!(origin = %origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    cors
}
