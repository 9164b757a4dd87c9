use actix_web::{web, HttpResponse};

use sb_core::errors::DomainError;

use crate::cookies::set_auth_cookies;
use crate::dto::{DetailResponse, RefreshTokenRequest};
use crate::handlers::error::handle_domain_error;
use crate::middleware::RequestContext;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/token/refresh
///
/// Rotates the refresh token. The `refresh_token` cookie is used when
/// present, otherwise the `refresh_token` field of an optional JSON body.
///
/// # Response
///
/// - 200 OK: `{"detail": "Token refreshed"}` with new auth cookies
/// - 401 Unauthorized: Missing, invalid, expired, revoked or already rotated token
pub async fn refresh_token(
    state: web::Data<AppState>,
    context: RequestContext,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse {
    let presented = context
        .refresh_token
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token))
        .filter(|t| !t.is_empty());

    let Some(presented) = presented else {
        return handle_domain_error(DomainError::Unauthorized);
    };

    match state.auth_service.refresh(&presented, &context.client).await {
        Ok(tokens) => {
            let mut response = HttpResponse::Ok();
            set_auth_cookies(&mut response, &tokens, &state.cookies);
            response.json(DetailResponse::new("Token refreshed"))
        }
        Err(error) => handle_domain_error(error),
    }
}
