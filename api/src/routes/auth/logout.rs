use actix_web::{web, HttpResponse};

use crate::cookies::{clear_auth_cookies, expired_auth_cookies};
use crate::dto::RefreshTokenRequest;
use crate::handlers::error::handle_domain_error;
use crate::middleware::RequestContext;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented refresh token and clears both auth cookies. No
/// access token is required, so an expired session can still log out.
/// Missing, invalid and already revoked tokens are accepted.
///
/// # Response
///
/// - 205 Reset Content: Cookies cleared
/// - 500 Internal Server Error: The revocation could not be stored
pub async fn logout(
    state: web::Data<AppState>,
    context: RequestContext,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse {
    let presented = context
        .refresh_token
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token));

    match state.auth_service.logout(presented.as_deref()).await {
        Ok(()) => {
            let mut response = HttpResponse::ResetContent();
            clear_auth_cookies(&mut response, &state.cookies);
            response.finish()
        }
        Err(error) => {
            let mut response = handle_domain_error(error);
            for cookie in expired_auth_cookies(&state.cookies) {
                if let Err(e) = response.add_cookie(&cookie) {
                    tracing::warn!(error = %e, "Failed to clear auth cookie");
                }
            }
            response
        }
    }
}
