//! Conversion of domain errors into HTTP responses
//!
//! Every error body has the shape of [`ErrorResponse`]. Messages are generic;
//! the underlying cause is only logged.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use validator::Validate;

use sb_core::errors::{AuthError, DomainError, TokenError};
use sb_shared::{error_codes, ErrorResponse};

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Status, machine code and message for a domain error
fn classify(error: &DomainError) -> (StatusCode, &'static str, String) {
    match error {
        DomainError::Token(token_error) => match token_error {
            TokenError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_TOKEN,
                token_error.to_string(),
            ),
            TokenError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                error_codes::TOKEN_EXPIRED,
                token_error.to_string(),
            ),
            TokenError::RevokedOrMissing => (
                StatusCode::UNAUTHORIZED,
                error_codes::TOKEN_REVOKED,
                token_error.to_string(),
            ),
            TokenError::TokenGenerationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                INTERNAL_MESSAGE.to_string(),
            ),
        },
        DomainError::Auth(auth_error) => {
            let code = match auth_error {
                AuthError::UserNotFound => error_codes::USER_NOT_FOUND,
                AuthError::UserAlreadyExists => error_codes::USER_ALREADY_EXISTS,
                AuthError::InvalidOtp => error_codes::INVALID_OTP,
                AuthError::SessionExpired => error_codes::SESSION_EXPIRED,
                AuthError::StateMismatch => error_codes::STATE_MISMATCH,
                AuthError::UpstreamFailure => error_codes::AUTHENTICATION_FAILED,
            };
            let status = match auth_error {
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            };
            (status, code, auth_error.to_string())
        }
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            message.clone(),
        ),
        DomainError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            "Authentication required".to_string(),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            format!("{} not found", capitalize(resource)),
        ),
        DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            INTERNAL_MESSAGE.to_string(),
        ),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code, detail) = classify(&error);

    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::info!(error = %error, status = status.as_u16(), "Request rejected");
    }

    HttpResponse::build(status).json(ErrorResponse::new(code, detail))
}

/// Run `validator` rules on a request body
pub fn validate_request<T: Validate>(request: &T) -> Result<(), DomainError> {
    request.validate().map_err(|errors| {
        let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        DomainError::Validation {
            message: format!("Invalid request data: {}", fields.join(", ")),
        }
    })
}

/// A domain error raised outside a handler body (middleware, extractors)
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        classify(&self.0).0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code, detail) = classify(&self.0);
        HttpResponse::build(status).json(ErrorResponse::new(code, detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_token_errors_are_unauthorized() {
        for error in [
            TokenError::InvalidToken,
            TokenError::ExpiredToken,
            TokenError::RevokedOrMissing,
        ] {
            let response = handle_domain_error(error.into());
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = handle_domain_error(TokenError::TokenGenerationFailed.into());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_login_errors_are_bad_requests() {
        for error in [
            AuthError::InvalidOtp,
            AuthError::SessionExpired,
            AuthError::StateMismatch,
            AuthError::UpstreamFailure,
            AuthError::UserNotFound,
        ] {
            let response = handle_domain_error(error.into());
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let response = handle_domain_error(AuthError::UserAlreadyExists.into());
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_internal_detail_is_not_leaked() {
        let response = handle_domain_error(DomainError::Internal {
            message: "connection refused to 10.0.0.3".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["detail"], "An internal error occurred");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_not_found_message() {
        let response = handle_domain_error(DomainError::NotFound {
            resource: "user".to_string(),
        });
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["detail"], "User not found");
    }

    #[actix_web::test]
    async fn test_upstream_failure_is_opaque() {
        let body = body_json(handle_domain_error(AuthError::UpstreamFailure.into())).await;
        assert_eq!(body["error"], "authentication_failed");
        assert_eq!(body["detail"], "Authentication failed");
    }

    #[test]
    fn test_api_error_status() {
        let error = ApiError(TokenError::ExpiredToken.into());
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(error.to_string(), "Token expired");
    }
}
