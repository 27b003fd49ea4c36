use async_trait::async_trait;
use domain::DomainEvent;
use domain::event::{EventPublisher, PublishError};
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out of domain events (SSE clients, tests).
///
/// Publishing never fails: with no subscriber the event is dropped, and a
/// slow subscriber skips what it lagged behind on.
#[derive(Clone)]
pub struct BroadcastEventPublisher {
    tx: broadcast::Sender<DomainEvent>,
}

impl BroadcastEventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<(), PublishError> {
        let event_type = event.event_type().to_string();
        match self.tx.send(event) {
            Ok(receivers) => trace!(event_type = %event_type, receivers, "Event broadcast"),
            Err(_) => trace!(event_type = %event_type, "No subscribers, event dropped"),
        }
        Ok(())
    }
}
