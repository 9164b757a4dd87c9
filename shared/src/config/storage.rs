//! Backing store selection

use serde::{Deserialize, Serialize};

/// Where users, refresh records, OTP challenges and OAuth handshakes live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// MySQL for records, Redis for short-lived entries
    #[default]
    External,
    /// Process-local maps; state is lost on restart
    Memory,
}

impl StorageBackend {
    /// Read `STORAGE_BACKEND` (`external` or `memory`)
    pub fn from_env() -> Self {
        std::env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "external" | "mysql" => Ok(StorageBackend::External),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}
