use anyhow::Result;
use async_trait::async_trait;
use futures_util::StreamExt;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    message::Message,
};

use super::envelope::BusEnvelope;

// ============================================================================
// Event Consumer - the uniform relay loop
// ============================================================================
//
// Every consumer follows the same shape: subscribe(topics) -> on message ->
// deserialize -> side effect -> optional republish. Failure handling is
// catch-log-continue: a bad payload or a failed side effect is logged and the
// loop moves on. Offsets are committed after hand-off, so delivery is
// at-least-once and redelivered events are processed again as-is.
//
// ============================================================================

/// A consumer's side effect. Implementations log their own domain context;
/// the loop logs transport and decode failures.
#[async_trait]
pub trait EventHandler: Send {
    async fn handle(&mut self, envelope: BusEnvelope) -> Result<()>;
}

/// Subscribe a handler to `topics` under `group_id` and drive it on a
/// background task. The task runs until the process exits or the broker
/// connection is torn down.
pub fn spawn_consumer<H>(
    brokers: &str,
    group_id: &str,
    topics: &[&str],
    mut handler: H,
) -> Result<tokio::task::JoinHandle<()>>
where
    H: EventHandler + 'static,
{
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", brokers)
        .set("group.id", group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "latest")
        .set("session.timeout.ms", "6000")
        .create()
        .map_err(|e| anyhow::anyhow!("Failed to create consumer for {group_id}: {e}"))?;

    consumer
        .subscribe(topics)
        .map_err(|e| anyhow::anyhow!("Failed to subscribe {group_id} to {topics:?}: {e}"))?;

    tracing::info!(
        group = %group_id,
        topics = ?topics,
        "Consumer subscribed"
    );

    let group = group_id.to_string();
    let handle = tokio::spawn(async move {
        let mut stream = consumer.stream();

        while let Some(msg_result) = stream.next().await {
            let message = match msg_result {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!(group = %group, error = %e, "Failed to receive message");
                    continue;
                }
            };

            match decode(message.payload()) {
                Ok(envelope) => {
                    let event_id = envelope.event_id;
                    let event_type = envelope.event_type.clone();

                    if let Err(e) = handler.handle(envelope).await {
                        tracing::error!(
                            group = %group,
                            event_id = %event_id,
                            event_type = %event_type,
                            error = %e,
                            "Handler failed, skipping event"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(
                        group = %group,
                        topic = message.topic(),
                        offset = message.offset(),
                        error = %e,
                        "Undecodable event, skipping"
                    );
                }
            }

            // Commit after hand-off. The event is consumed whether or not the
            // side effect succeeded; there is no dead-letter queue or replay.
            if let Err(e) = consumer.commit_message(&message, CommitMode::Async) {
                tracing::warn!(
                    group = %group,
                    topic = message.topic(),
                    offset = message.offset(),
                    error = %e,
                    "Failed to commit offset, event may be redelivered"
                );
            }
        }

        tracing::warn!(group = %group, "Consumer stream ended");
    });

    Ok(handle)
}

fn decode(payload: Option<&[u8]>) -> Result<BusEnvelope> {
    let bytes = payload.ok_or_else(|| anyhow::anyhow!("Message has no payload"))?;
    let text = std::str::from_utf8(bytes)?;
    BusEnvelope::from_json(text)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{DeliveryEvent, OrderReady};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_decode_rejects_missing_payload() {
        assert!(decode(None).is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(Some(b"not json")).is_err());
    }

    #[test]
    fn test_decode_round_trip() {
        let id = Uuid::new_v4();
        let envelope = BusEnvelope::wrap(
            DeliveryEvent::OrderReady(OrderReady {
                order_id: id,
                customer_id: id,
                partner_id: id,
                ready_at: Utc::now(),
            }),
            Uuid::new_v4(),
        );
        let json = envelope.to_json().unwrap();

        let decoded = decode(Some(json.as_bytes())).unwrap();
        assert_eq!(decoded.event_id, envelope.event_id);
    }
}
