use anyhow::Result;
use rdkafka::{
    config::ClientConfig,
    producer::{FutureProducer, FutureRecord},
};

use crate::utils::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState};

use super::envelope::BusEnvelope;
use super::topics;

// ============================================================================
// Event Publisher
// ============================================================================
//
// Thin wrapper over the Kafka producer. Publishes JSON envelopes keyed by
// order id so one order's events stay on one partition. A circuit breaker
// guards the broker: once it opens, publishes fail fast until the broker
// recovers.
//
// ============================================================================

pub struct EventPublisher {
    producer: FutureProducer,
    circuit_breaker: CircuitBreaker,
}

impl EventPublisher {
    pub fn new(brokers: &str) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| anyhow::anyhow!("Failed to create Kafka producer: {e}"))?;

        let cb_config = CircuitBreakerConfig {
            failure_threshold: 5,
            timeout: std::time::Duration::from_secs(30),
            success_threshold: 3,
        };

        Ok(Self {
            producer,
            circuit_breaker: CircuitBreaker::new(cb_config),
        })
    }

    /// Publish one envelope to its event type's topic.
    pub async fn publish(&self, envelope: &BusEnvelope) -> Result<()> {
        let topic = topics::topic_for(&envelope.event_data);
        let key = envelope.order_id.to_string();
        let payload = envelope.to_json()?;

        let result = self
            .circuit_breaker
            .call(async {
                let record = FutureRecord::to(topic).key(&key).payload(&payload);

                self.producer
                    .send(
                        record,
                        rdkafka::util::Timeout::After(std::time::Duration::from_secs(5)),
                    )
                    .await
                    .map_err(|(e, _)| anyhow::anyhow!("Kafka send error: {e}"))?;

                Ok::<(), anyhow::Error>(())
            })
            .await;

        match result {
            Ok(()) => {
                tracing::info!(
                    topic = %topic,
                    order_id = %envelope.order_id,
                    event_type = %envelope.event_type,
                    event_id = %envelope.event_id,
                    "Published event"
                );
                Ok(())
            }
            Err(CircuitBreakerError::CircuitOpen) => {
                tracing::error!(
                    topic = %topic,
                    event_type = %envelope.event_type,
                    "Circuit breaker open, broker unavailable"
                );
                Err(anyhow::anyhow!("Circuit breaker open for Kafka broker"))
            }
            Err(CircuitBreakerError::OperationFailed(e)) => {
                tracing::error!(
                    error = %e,
                    topic = %topic,
                    event_type = %envelope.event_type,
                    "Failed to publish event"
                );
                Err(e)
            }
        }
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.get_state().await
    }
}
