//! Per-request context extractor
//!
//! Collects what the auth handlers need from the incoming request: the
//! browser session id, client metadata for refresh records and any tokens
//! sent as cookies.

use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, http::header::USER_AGENT, web, Error, FromRequest, HttpMessage, HttpRequest,
};

use sb_core::domain::value_objects::ClientMetadata;

use crate::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::state::AppState;

const DEFAULT_SESSION_COOKIE: &str = "session_id";

/// Request-scoped data read from headers and cookies
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Value of the browser session cookie
    pub session_id: Option<String>,
    /// Client IP and user agent
    pub client: ClientMetadata,
    /// `access_token` cookie
    pub access_token: Option<String>,
    /// `refresh_token` cookie
    pub refresh_token: Option<String>,
}

impl RequestContext {
    /// Build the context using the given session cookie name
    pub fn from_request_with(req: &HttpRequest, session_cookie_name: &str) -> Self {
        let cookie_value = |name: &str| {
            req.cookie(name)
                .map(|c| c.value().to_string())
                .filter(|v| !v.is_empty())
        };

        let ip_address = req
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string);
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            session_id: cookie_value(session_cookie_name),
            client: ClientMetadata::new(ip_address, user_agent),
            access_token: cookie_value(ACCESS_TOKEN_COOKIE),
            refresh_token: cookie_value(REFRESH_TOKEN_COOKIE),
        }
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session_cookie_name = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.cookies.session_cookie_name.clone())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

        ready(Ok(Self::from_request_with(req, &session_cookie_name)))
    }
}
