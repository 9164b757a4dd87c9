//! Application factory
//!
//! Builds the actix-web application from shared state. The binary and the
//! integration tests go through the same function.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use sb_core::errors::DomainError;
use sb_shared::config::AppConfig;
use sb_shared::{error_codes, ErrorResponse};

use crate::handlers::ApiError;
use crate::middleware::{create_cors, JwtAuth, SecurityMiddleware};
use crate::routes::auth::{
    google_callback, google_login, logout, me, refresh_token, send_otp, verify_otp,
};
use crate::routes::health::health_check;
use crate::state::AppState;

/// Maximum accepted JSON body size
const JSON_LIMIT: usize = 16 * 1024;

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&config.cors, config.environment);
    let security =
        SecurityMiddleware::for_environment(config.environment, config.server.trusted_proxies.clone());

    App::new()
        .app_data(state)
        .app_data(json_config())
        // Middleware order matters: the last one registered runs first
        .wrap(TracingLogger::default())
        .wrap(cors)
        .wrap(security)
        .configure(configure_routes)
        .default_service(web::route().to(not_found))
}

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1/auth")
            .route("/otp/send", web::post().to(send_otp))
            .route("/otp/verify", web::post().to(verify_otp))
            .route("/token/refresh", web::post().to(refresh_token))
            .route("/logout", web::post().to(logout))
            .service(
                web::resource("/me")
                    .wrap(JwtAuth::new())
                    .route(web::get().to(me)),
            )
            .route("/google", web::get().to(google_login))
            .route("/google/callback", web::get().to(google_callback)),
    );
}

/// Malformed JSON bodies get the standard error body
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected request body");
            ApiError(DomainError::Validation {
                message: "Invalid request body".to_string(),
            })
            .into()
        })
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
