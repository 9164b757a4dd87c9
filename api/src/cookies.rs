//! Auth and session cookies
//!
//! Token cookies are HttpOnly, SameSite=Lax and live exactly as long as the
//! token they carry. `Secure`, domain and path come from [`CookieConfig`].

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::HttpResponseBuilder;

use sb_core::domain::entities::TokenPair;
use sb_shared::config::CookieConfig;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

fn base_cookie(
    name: impl Into<String>,
    value: impl Into<String>,
    max_age_seconds: i64,
    config: &CookieConfig,
) -> Cookie<'static> {
    let mut cookie = Cookie::build(name.into(), value.into())
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish();

    if let Some(domain) = &config.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}

/// Cookies carrying a freshly issued pair
pub fn auth_cookies(tokens: &TokenPair, config: &CookieConfig) -> [Cookie<'static>; 2] {
    [
        base_cookie(
            ACCESS_TOKEN_COOKIE,
            tokens.access_token.clone(),
            tokens.access_ttl_seconds,
            config,
        ),
        base_cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
            tokens.refresh_ttl_seconds,
            config,
        ),
    ]
}

/// Empty cookies that make the browser drop both tokens
pub fn expired_auth_cookies(config: &CookieConfig) -> [Cookie<'static>; 2] {
    [
        base_cookie(ACCESS_TOKEN_COOKIE, "", 0, config),
        base_cookie(REFRESH_TOKEN_COOKIE, "", 0, config),
    ]
}

/// Browser session cookie binding an OAuth handshake to the browser
pub fn session_cookie(session_id: &str, config: &CookieConfig) -> Cookie<'static> {
    base_cookie(
        config.session_cookie_name.clone(),
        session_id.to_string(),
        config.session_ttl_seconds,
        config,
    )
}

/// Attach both auth cookies to a response
pub fn set_auth_cookies(builder: &mut HttpResponseBuilder, tokens: &TokenPair, config: &CookieConfig) {
    for cookie in auth_cookies(tokens, config) {
        builder.cookie(cookie);
    }
}

/// Attach cookies clearing both tokens to a response
pub fn clear_auth_cookies(builder: &mut HttpResponseBuilder, config: &CookieConfig) {
    for cookie in expired_auth_cookies(config) {
        builder.cookie(cookie);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            access_ttl_seconds: 900,
            refresh_ttl_seconds: 2592000,
            refresh_record_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let config = CookieConfig {
            domain: Some("example.com".to_string()),
            secure: true,
            ..Default::default()
        };
        let [access, refresh] = auth_cookies(&pair(), &config);

        assert_eq!(access.name(), "access_token");
        assert_eq!(access.value(), "access");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.max_age(), Some(Duration::seconds(900)));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.domain(), Some("example.com"));

        assert_eq!(refresh.name(), "refresh_token");
        assert_eq!(refresh.max_age(), Some(Duration::seconds(2592000)));
    }

    #[test]
    fn test_expired_cookies_are_empty() {
        for cookie in expired_auth_cookies(&CookieConfig::default()) {
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(Duration::ZERO));
            assert!(cookie.domain().is_none());
        }
    }

    #[test]
    fn test_session_cookie() {
        let config = CookieConfig::default();
        let cookie = session_cookie("abc", &config);
        assert_eq!(cookie.name(), "session_id");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
