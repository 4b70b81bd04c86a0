//! A no-op [`EventSink`].

use async_trait::async_trait;
use banner_core::{Event, EventSink};

/// An `EventSink` that discards every event, logging it at debug level.
///
/// Used by tests and by any deployment that runs without a message broker.
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    async fn publish(&self, event: &Event) {
        tracing::debug!(
            event_id = event.id,
            banner_id = event.banner_id,
            slot_id = event.slot_id,
            group_id = event.group_id,
            kind = ?event.kind,
            "discarding event: no sink configured"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banner_core::{EventKind, NewEvent};

    #[tokio::test]
    async fn publish_never_panics() {
        let sink = NullSink;
        let event = NewEvent::now(EventKind::View, 1, 1, 1);
        let stored = banner_core::Event {
            id: 1,
            kind: event.kind,
            banner_id: event.banner_id,
            slot_id: event.slot_id,
            group_id: event.group_id,
            created_at: event.created_at,
        };
        sink.publish(&stored).await;
    }
}
