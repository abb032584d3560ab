use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::GeoPoint;
use super::order::model::{DeliveryAddress, OrderItem};

// ============================================================================
// Bus Events - Everything published on the event bus
// ============================================================================
//
// One topic per event type; every consumer deserializes the same union and
// reacts to the variants it cares about. Payloads carry the party ids a
// consumer needs for routing, so no consumer has to call back into the
// orders table to decide who is affected.
//
// ============================================================================

/// Union type for all platform events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DeliveryEvent {
    OrderPlaced(OrderPlaced),
    OrderAccepted(OrderAccepted),
    OrderRejected(OrderRejected),
    OrderReady(OrderReady),
    OrderPickedUp(OrderPickedUp),
    OrderDelivered(OrderDelivered),
    LocationUpdate(LocationUpdate),
    DriverArriving(DriverArriving),
}

impl DeliveryEvent {
    /// Stable name used for logging and the envelope's event_type field.
    pub fn event_type(&self) -> &'static str {
        match self {
            DeliveryEvent::OrderPlaced(_) => "OrderPlaced",
            DeliveryEvent::OrderAccepted(_) => "OrderAccepted",
            DeliveryEvent::OrderRejected(_) => "OrderRejected",
            DeliveryEvent::OrderReady(_) => "OrderReady",
            DeliveryEvent::OrderPickedUp(_) => "OrderPickedUp",
            DeliveryEvent::OrderDelivered(_) => "OrderDelivered",
            DeliveryEvent::LocationUpdate(_) => "LocationUpdate",
            DeliveryEvent::DriverArriving(_) => "DriverArriving",
        }
    }

    /// The order this event belongs to. Doubles as the partition key.
    pub fn order_id(&self) -> Uuid {
        match self {
            DeliveryEvent::OrderPlaced(e) => e.order_id,
            DeliveryEvent::OrderAccepted(e) => e.order_id,
            DeliveryEvent::OrderRejected(e) => e.order_id,
            DeliveryEvent::OrderReady(e) => e.order_id,
            DeliveryEvent::OrderPickedUp(e) => e.order_id,
            DeliveryEvent::OrderDelivered(e) => e.order_id,
            DeliveryEvent::LocationUpdate(e) => e.order_id,
            DeliveryEvent::DriverArriving(e) => e.order_id,
        }
    }
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// A customer placed a new order with a partner.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderPlaced {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub items: Vec<OrderItem>,
    pub address: DeliveryAddress,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub placed_at: DateTime<Utc>,
}

/// The partner accepted the order for preparation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderAccepted {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub eta_minutes: Option<u32>,
    pub accepted_at: DateTime<Utc>,
}

/// The partner turned the order down.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderRejected {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub reason: Option<String>,
    pub rejected_at: DateTime<Utc>,
}

/// The order is prepared and waiting for a courier.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderReady {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub ready_at: DateTime<Utc>,
}

/// A courier collected the order from the partner.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderPickedUp {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub agent_id: Uuid,
    pub picked_up_at: DateTime<Utc>,
}

/// The courier handed the order to the customer.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct OrderDelivered {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub agent_id: Uuid,
    pub delivered_at: DateTime<Utc>,
}

/// Periodic courier position while an order is on its way.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LocationUpdate {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub agent_id: Uuid,
    pub location: GeoPoint,
    pub recorded_at: DateTime<Utc>,
}

/// The courier is within the arrival radius of the drop point.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DriverArriving {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub agent_id: Uuid,
    pub distance_m: f64,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_round_trips_through_tagged_json() {
        let event = DeliveryEvent::OrderReady(OrderReady {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            ready_at: Utc::now(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"OrderReady\""));

        let back: DeliveryEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type(), "OrderReady");
        assert_eq!(back.order_id(), event.order_id());
    }

    #[test]
    fn test_event_type_names_are_distinct() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let events = vec![
            DeliveryEvent::OrderReady(OrderReady {
                order_id: id,
                customer_id: id,
                partner_id: id,
                ready_at: now,
            }),
            DeliveryEvent::DriverArriving(DriverArriving {
                order_id: id,
                customer_id: id,
                agent_id: id,
                distance_m: 10.0,
                recorded_at: now,
            }),
        ];

        let mut names: Vec<&str> = events.iter().map(|e| e.event_type()).collect();
        names.dedup();
        assert_eq!(names.len(), events.len());
    }
}
