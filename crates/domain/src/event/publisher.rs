use crate::DomainEvent;
use async_trait::async_trait;

/// Sink failures are opaque to the services emitting events
pub type PublishError = Box<dyn std::error::Error + Send + Sync>;

/// Outbound port for domain events (SSE fan-out, logs)
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError>;
}
