use actix_web::{web, HttpResponse};

use crate::dto::UserResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/me
///
/// Requires a valid access token (Bearer header or `access_token` cookie).
///
/// # Response
///
/// - 200 OK: `{id, email, name, avatar, is_email_verified}`
/// - 401 Unauthorized: Missing, invalid or expired access token
/// - 404 Not Found: The user no longer exists
pub async fn me(state: web::Data<AppState>, auth: AuthContext) -> HttpResponse {
    match state.auth_service.current_user(auth.user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse::from(user)),
        Err(error) => handle_domain_error(error),
    }
}
