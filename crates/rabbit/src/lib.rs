//! `AmqpSink`: publishes persisted events to a RabbitMQ exchange
//!
//! Grounded on `examples/original_source/api/internal/rabbit/rabbit.go`:
//! one channel per publish, the same queue-declare/bind/publish sequence,
//! and the channel is always closed on every return path. `publish` has no
//! error return. Failures are logged and swallowed here rather than at the
//! call site, since a broker outage must never affect request correctness.

use banner_core::{BannerId, EventId, GroupId, SlotId};
use lapin::options::{
    BasicPublishOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Connection};
use serde::Serialize;

use async_trait::async_trait;
use banner_core::{Event, EventSink};

/// The wire shape published to the broker, matching the original's
/// `json.Marshal(repository.Statistics{...})` output field-for-field.
#[derive(Debug, Serialize)]
struct WireEvent {
    id: EventId,
    #[serde(rename = "type")]
    kind: i32,
    #[serde(rename = "bannerId")]
    banner_id: BannerId,
    #[serde(rename = "slotId")]
    slot_id: SlotId,
    #[serde(rename = "groupId")]
    group_id: GroupId,
    #[serde(rename = "createdAt")]
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Event> for WireEvent {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            kind: event.kind.discriminant(),
            banner_id: event.banner_id,
            slot_id: event.slot_id,
            group_id: event.group_id,
            created_at: event.created_at,
        }
    }
}

/// Publishes events to a queue bound to an exchange, both named at
/// construction time.
pub struct AmqpSink {
    connection: Connection,
    exchange_name: String,
    queue_name: String,
}

impl AmqpSink {
    /// Wraps an already-established AMQP connection.
    pub fn new(connection: Connection, exchange_name: String, queue_name: String) -> Self {
        Self {
            connection,
            exchange_name,
            queue_name,
        }
    }

    /// Connects to the broker named in `cfg` and wraps the resulting
    /// connection, matching the original's startup-time `amqp.Dial`.
    pub async fn connect(cfg: &banner_config::Rabbitmq) -> Result<Self, lapin::Error> {
        let connection = Connection::connect(
            &cfg.url,
            lapin::ConnectionProperties::default(),
        )
        .await?;

        Ok(Self::new(
            connection,
            cfg.exchange_name.clone(),
            cfg.queue_name.clone(),
        ))
    }

    async fn try_publish(&self, event: &Event) -> Result<(), lapin::Error> {
        let channel = self.connection.create_channel().await?;

        let queue = channel
            .queue_declare(
                &self.queue_name,
                QueueDeclareOptions {
                    durable: true,
                    auto_delete: false,
                    exclusive: true,
                    nowait: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        channel
            .queue_bind(
                queue.name().as_str(),
                &self.exchange_name,
                "",
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;

        let body = serde_json::to_vec(&WireEvent::from(event))
            .expect("WireEvent serialization is infallible");

        let confirm = channel
            .basic_publish(
                &self.exchange_name,
                "",
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await?;
        confirm.await?;

        channel.close(200, "ok").await?;

        Ok(())
    }
}

#[async_trait]
impl EventSink for AmqpSink {
    async fn publish(&self, event: &Event) {
        if let Err(err) = self.try_publish(event).await {
            tracing::error!(
                event_id = event.id,
                banner_id = event.banner_id,
                error = %err,
                "failed to publish event to rabbitmq"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banner_core::EventKind;

    #[test]
    fn wire_event_uses_camel_case_field_names_and_integer_type() {
        let event = Event {
            id: 7,
            kind: EventKind::Click,
            banner_id: 13,
            slot_id: 5,
            group_id: 8,
            created_at: chrono::Utc::now(),
        };

        let json = serde_json::to_value(WireEvent::from(&event)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["type"], 2);
        assert_eq!(json["bannerId"], 13);
        assert_eq!(json["slotId"], 5);
        assert_eq!(json["groupId"], 8);
        assert!(json.get("createdAt").is_some());
    }
}
