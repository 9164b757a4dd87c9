use actix_web::{web, HttpResponse};

use crate::cookies::set_auth_cookies;
use crate::dto::{DetailResponse, SendOtpRequest, VerifyOtpRequest};
use crate::handlers::error::{handle_domain_error, validate_request};
use crate::middleware::RequestContext;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/otp/send
///
/// Emails a six-digit login code. Unknown addresses get an unverified
/// account so the code can be redeemed.
///
/// # Request Body
///
/// ```json
/// { "email": "jane@example.com" }
/// ```
///
/// # Response
///
/// - 200 OK: `{"detail": "OTP sent"}`
/// - 400 Bad Request: Invalid email, or the mailer failed
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    if let Err(error) = validate_request(&*request) {
        return handle_domain_error(error);
    }

    match state.auth_service.send_otp(&request.email).await {
        Ok(()) => HttpResponse::Ok().json(DetailResponse::new("OTP sent")),
        Err(error) => handle_domain_error(error),
    }
}

/// Handler for POST /api/v1/auth/otp/verify
///
/// Exchanges a code for a token pair delivered as cookies.
///
/// # Request Body
///
/// ```json
/// { "email": "jane@example.com", "code": "123456" }
/// ```
///
/// # Response
///
/// - 200 OK: `{"detail": "OTP verified"}` with `access_token` and `refresh_token` cookies
/// - 400 Bad Request: Unknown user, wrong, expired or exhausted code
pub async fn verify_otp(
    state: web::Data<AppState>,
    context: RequestContext,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    if let Err(error) = validate_request(&*request) {
        return handle_domain_error(error);
    }

    match state
        .auth_service
        .verify_otp(&request.email, &request.code, &context.client)
        .await
    {
        Ok(outcome) => {
            let mut response = HttpResponse::Ok();
            set_auth_cookies(&mut response, &outcome.tokens, &state.cookies);
            response.json(DetailResponse::new("OTP verified"))
        }
        Err(error) => handle_domain_error(error),
    }
}
