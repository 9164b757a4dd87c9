//! PKCE (RFC 7636) and random handshake values

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

const STATE_BYTES: usize = 24;
const VERIFIER_BYTES: usize = 32;
const SESSION_ID_BYTES: usize = 32;

fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Anti-CSRF state parameter
pub fn generate_state() -> String {
    random_token(STATE_BYTES)
}

/// PKCE code verifier, 43 URL-safe characters
pub fn generate_code_verifier() -> String {
    random_token(VERIFIER_BYTES)
}

/// Opaque browser session identifier
pub fn generate_session_id() -> String {
    random_token(SESSION_ID_BYTES)
}

/// S256 code challenge: `base64url_nopad(SHA-256(verifier))`
pub fn compute_code_challenge(code_verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc7636_appendix_b_vector() {
        let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
        assert_eq!(
            compute_code_challenge(verifier),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_verifier_shape() {
        let verifier = generate_code_verifier();
        assert_eq!(verifier.len(), 43);
        assert!(verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_state_and_session_lengths() {
        assert_eq!(generate_state().len(), 32);
        assert_eq!(generate_session_id().len(), 43);
        assert_ne!(generate_state(), generate_state());
    }
}
