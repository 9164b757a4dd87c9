//! Mock collaborators for the OAuth service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::entities::{GoogleIdentity, OAuthHandshakeState};
use crate::errors::DomainError;
use crate::services::oauth::{OAuthProvider, SessionStore};

pub struct MockSessionStore {
    pub handshakes: Arc<Mutex<HashMap<String, OAuthHandshakeState>>>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self {
            handshakes: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, session_id: &str) -> Option<OAuthHandshakeState> {
        self.handshakes.lock().unwrap().get(session_id).cloned()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn put_handshake(
        &self,
        session_id: &str,
        handshake: &OAuthHandshakeState,
        _ttl_seconds: u64,
    ) -> Result<(), DomainError> {
        self.handshakes
            .lock()
            .unwrap()
            .insert(session_id.to_string(), handshake.clone());
        Ok(())
    }

    async fn get_handshake(
        &self,
        session_id: &str,
    ) -> Result<Option<OAuthHandshakeState>, DomainError> {
        Ok(self.get(session_id))
    }

    async fn take_handshake(
        &self,
        session_id: &str,
    ) -> Result<Option<OAuthHandshakeState>, DomainError> {
        Ok(self.handshakes.lock().unwrap().remove(session_id))
    }
}

pub struct MockOAuthProvider {
    pub identity: GoogleIdentity,
    pub fail_exchange: bool,
    pub fail_verify: bool,
    pub exchanges: AtomicUsize,
    pub last_verifier: Mutex<Option<String>>,
}

impl MockOAuthProvider {
    pub fn new(identity: GoogleIdentity) -> Self {
        Self {
            identity,
            fail_exchange: false,
            fail_verify: false,
            exchanges: AtomicUsize::new(0),
            last_verifier: Mutex::new(None),
        }
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthProvider for MockOAuthProvider {
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<String, DomainError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        *self.last_verifier.lock().unwrap() = Some(code_verifier.to_string());
        if self.fail_exchange {
            return Err(DomainError::Internal {
                message: "invalid_grant".to_string(),
            });
        }
        Ok(format!("id-token-for-{}", code))
    }

    async fn verify_id_token(&self, _id_token: &str) -> Result<GoogleIdentity, DomainError> {
        if self.fail_verify {
            return Err(DomainError::Internal {
                message: "bad signature".to_string(),
            });
        }
        Ok(self.identity.clone())
    }
}

pub fn identity(email: Option<&str>) -> GoogleIdentity {
    GoogleIdentity {
        subject: "109876543210".to_string(),
        email: email.map(str::to_string),
        email_verified: true,
        name: Some("Jane Doe".to_string()),
        picture: Some("https://lh3.googleusercontent.com/a/jane".to_string()),
    }
}
