//! Event bus
//!
//! Fans domain events out to in-process subscribers (the SSE changefeed) via
//! a broadcast channel and mirrors them to NATS subjects when a connection is
//! configured. Publication is best effort: a full channel or a NATS hiccup
//! never fails the request that produced the event.

use tokio::sync::broadcast;

use crate::domain::events::DomainEvent;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
    nats: Option<async_nats::Client>,
    prefix: String,
}

impl EventBus {
    pub fn new(nats: Option<async_nats::Client>, prefix: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            nats,
            prefix: prefix.into(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    pub async fn publish(&self, event: DomainEvent) {
        // send() only errors when there are no subscribers, which is fine.
        let _ = self.tx.send(event.clone());

        if let Some(nats) = &self.nats {
            let subject = format!("{}.{}", self.prefix, event.kind());
            match serde_json::to_vec(&event) {
                Ok(payload) => {
                    if let Err(e) = nats.publish(subject, payload.into()).await {
                        tracing::warn!("failed to mirror event to nats: {e}");
                    }
                }
                Err(e) => tracing::warn!("failed to serialize event: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::ProductEvent;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new(None, "atelier");
        let mut rx = bus.subscribe();

        let id = Uuid::now_v7();
        bus.publish(DomainEvent::Product(ProductEvent::Created { id }))
            .await;

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            DomainEvent::Product(ProductEvent::Created { id: got }) if got == id
        ));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let bus = EventBus::new(None, "atelier");
        bus.publish(DomainEvent::Product(ProductEvent::Deleted {
            id: Uuid::now_v7(),
        }))
        .await;
    }
}
