use actix_web::{http::header::LOCATION, web, HttpResponse};

use sb_core::errors::AuthError;
use sb_core::services::oauth::pkce;

use crate::cookies::{session_cookie, set_auth_cookies};
use crate::dto::GoogleCallbackQuery;
use crate::handlers::error::handle_domain_error;
use crate::middleware::RequestContext;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/google
///
/// Reuses the browser session cookie, or sets a new one, stores a fresh PKCE
/// handshake under it and redirects to Google.
///
/// # Response
///
/// - 302 Found: `Location` is the Google authorization URL
pub async fn google_login(state: web::Data<AppState>, context: RequestContext) -> HttpResponse {
    let session_id = context
        .session_id
        .unwrap_or_else(pkce::generate_session_id);

    match state.oauth_service.begin(&session_id).await {
        Ok(url) => HttpResponse::Found()
            .insert_header((LOCATION, url))
            .cookie(session_cookie(&session_id, &state.cookies))
            .finish(),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for GET /api/v1/auth/google/callback
///
/// # Query
///
/// `code` and `state` as sent by Google, or `error` when the user declined.
///
/// # Response
///
/// - 302 Found: Redirect to the dashboard with auth cookies
/// - 400 Bad Request: Missing parameters, expired session, state mismatch or
///   failed exchange
pub async fn google_callback(
    state: web::Data<AppState>,
    context: RequestContext,
    query: web::Query<GoogleCallbackQuery>,
) -> HttpResponse {
    let query = query.into_inner();

    if let Some(error) = &query.error {
        tracing::info!(error = %error, "Google returned an authorization error");
        return handle_domain_error(AuthError::UpstreamFailure.into());
    }

    // A missing session cookie finds no handshake and reports SessionExpired.
    let session_id = context.session_id.unwrap_or_default();
    let code = query.code.unwrap_or_default();
    let returned_state = query.state.unwrap_or_default();

    match state
        .oauth_service
        .complete(&session_id, &code, &returned_state, &context.client)
        .await
    {
        Ok(outcome) => {
            let mut response = HttpResponse::Found();
            response.insert_header((LOCATION, state.post_login_redirect.clone()));
            set_auth_cookies(&mut response, &outcome.tokens, &state.cookies);
            response.finish()
        }
        Err(error) => handle_domain_error(error),
    }
}
