//! Readiness of the backing stores

use async_trait::async_trait;

/// A dependency the `/health` endpoint reports on
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Name shown in the health report
    fn component(&self) -> &'static str;

    /// Whether the dependency answers right now
    async fn is_healthy(&self) -> bool;
}
