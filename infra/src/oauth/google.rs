//! Google OAuth 2.0 client
//!
//! Exchanges authorization codes at Google's token endpoint and verifies the
//! returned ID tokens against Google's published JWKS.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use sb_core::domain::entities::GoogleIdentity;
use sb_core::errors::DomainError;
use sb_core::services::oauth::OAuthProvider;

use crate::config::GoogleOAuthConfig;
use crate::InfrastructureError;

/// Accepted values of the `iss` claim
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// How long fetched signing keys are reused before refetching
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl IdTokenClaims {
    /// Google has sent `email_verified` both as a boolean and as a string
    fn email_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// HTTP client for Google's OAuth endpoints
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    config: GoogleOAuthConfig,
    jwks: RwLock<Option<CachedKeys>>,
}

impl GoogleOAuthClient {
    /// Create a client with the configured request timeout
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            config,
            jwks: RwLock::new(None),
        })
    }

    /// POST the code and PKCE verifier to the token endpoint
    async fn request_id_token(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<String, InfrastructureError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", code_verifier),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Google token endpoint rejected code");
            return Err(InfrastructureError::General(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = response.json().await?;
        token
            .id_token
            .ok_or_else(|| InfrastructureError::General("token response has no id_token".into()))
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, InfrastructureError> {
        debug!(uri = %self.config.jwks_uri, "Fetching Google signing keys");
        let keys = self
            .http
            .get(&self.config.jwks_uri)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        Ok(keys)
    }

    /// Find the decoding key for `kid`, refetching the key set when it is
    /// stale or does not contain the key
    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, InfrastructureError> {
        {
            let cached = self.jwks.read().await;
            if let Some(cached) = cached.as_ref() {
                if cached.fetched_at.elapsed() < JWKS_CACHE_TTL {
                    if let Some(jwk) = cached.keys.find(kid) {
                        return DecodingKey::from_jwk(jwk).map_err(|e| {
                            InfrastructureError::General(format!("unusable signing key: {}", e))
                        });
                    }
                }
            }
        }

        let keys = self.fetch_jwks().await?;
        let key = keys
            .find(kid)
            .ok_or_else(|| InfrastructureError::General(format!("unknown signing key {}", kid)))
            .and_then(|jwk| {
                DecodingKey::from_jwk(jwk).map_err(|e| {
                    InfrastructureError::General(format!("unusable signing key: {}", e))
                })
            });

        *self.jwks.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key
    }

    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, InfrastructureError> {
        let header = decode_header(id_token)
            .map_err(|e| InfrastructureError::General(format!("malformed id_token: {}", e)))?;
        let kid = header
            .kid
            .ok_or_else(|| InfrastructureError::General("id_token has no kid".into()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.config.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let claims = decode::<IdTokenClaims>(id_token, &key, &validation)
            .map_err(|e| InfrastructureError::General(format!("id_token rejected: {}", e)))?
            .claims;

        Ok(GoogleIdentity {
            email_verified: claims.email_verified(),
            subject: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
        })
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthClient {
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<String, DomainError> {
        self.request_id_token(code, code_verifier).await.map_err(|e| {
            error!(error = %e, "Google code exchange failed");
            DomainError::from(e)
        })
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdentity, DomainError> {
        let identity = self.verify(id_token).await.map_err(|e| {
            warn!(error = %e, "Google ID token verification failed");
            DomainError::from(e)
        })?;
        info!(subject = %identity.subject, "Verified Google ID token");
        Ok(identity)
    }
}
