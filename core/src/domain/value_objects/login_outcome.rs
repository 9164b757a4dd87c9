use serde::{Deserialize, Serialize};

use crate::domain::entities::{TokenPair, User};

/// Result of a completed login: the (possibly new) user and their tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}
