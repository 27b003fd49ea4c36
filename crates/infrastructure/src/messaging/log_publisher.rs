use async_trait::async_trait;
use domain::DomainEvent;
use domain::event::{EventPublisher, PublishError};
use tracing::debug;

/// Writes every domain event to the log as JSON
pub struct LogEventPublisher;

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(&event)?;
        debug!(event_type = event.event_type(), %payload, "Domain event");
        Ok(())
    }
}
