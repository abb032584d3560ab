// ============================================================================
// Messaging Module - Kafka Event Bus
// ============================================================================
//
// Topic-per-event-type bus. The producer publishes JSON envelopes keyed by
// order id; consumers run in named consumer groups and commit offsets after
// hand-off (at-least-once, no deduplication on redelivery).
//
// ============================================================================

pub mod consumer;
pub mod envelope;
pub mod producer;
pub mod topics;

pub use consumer::{spawn_consumer, EventHandler};
pub use envelope::{BusEnvelope, EventEnvelope};
pub use producer::EventPublisher;
