use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::events::DeliveryEvent;

// ============================================================================
// Event Envelope - Wire Metadata
// ============================================================================
//
// Wraps bus events with the metadata consumers need: a unique event id,
// the owning order id (also the partition key), the event type name, and a
// correlation id that groups the events of one HTTP request or one simulated
// route.
//
// ============================================================================

/// Generic envelope; `E` is the payload union carried on the wire.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventEnvelope<E> {
    pub event_id: Uuid,
    pub order_id: Uuid,
    pub event_type: String,
    pub event_data: E,
    pub correlation_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// The envelope type every topic on this bus carries.
pub type BusEnvelope = EventEnvelope<DeliveryEvent>;

impl BusEnvelope {
    /// Wrap a domain event for publishing. Type name and order id are taken
    /// from the event itself so they cannot drift from the payload.
    pub fn wrap(event: DeliveryEvent, correlation_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            order_id: event.order_id(),
            event_type: event.event_type().to_string(),
            event_data: event,
            correlation_id,
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::OrderReady;

    fn sample_event() -> DeliveryEvent {
        DeliveryEvent::OrderReady(OrderReady {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            ready_at: Utc::now(),
        })
    }

    #[test]
    fn test_wrap_copies_identity_from_event() {
        let event = sample_event();
        let order_id = event.order_id();
        let correlation_id = Uuid::new_v4();

        let envelope = BusEnvelope::wrap(event, correlation_id);
        assert_eq!(envelope.order_id, order_id);
        assert_eq!(envelope.event_type, "OrderReady");
        assert_eq!(envelope.correlation_id, correlation_id);
    }

    #[test]
    fn test_json_round_trip() {
        let envelope = BusEnvelope::wrap(sample_event(), Uuid::new_v4());
        let json = envelope.to_json().unwrap();
        let back = BusEnvelope::from_json(&json).unwrap();

        assert_eq!(back.event_id, envelope.event_id);
        assert_eq!(back.order_id, envelope.order_id);
        assert_eq!(back.event_type, envelope.event_type);
    }

    #[test]
    fn test_distinct_event_ids_per_wrap() {
        let a = BusEnvelope::wrap(sample_event(), Uuid::new_v4());
        let b = BusEnvelope::wrap(sample_event(), Uuid::new_v4());
        assert_ne!(a.event_id, b.event_id);
    }
}
