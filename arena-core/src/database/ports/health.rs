use async_trait::async_trait;

use crate::error::Result;

/// Cheap round-trip used by the health endpoint.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<()>;
}
