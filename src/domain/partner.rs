use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{DeliveryEvent, OrderPlaced};
use super::geo::GeoPoint;
use super::order::model::{OrderItem, OrderStatus};

// ============================================================================
// Partner Model - Restaurants
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub street: String,
    pub city: String,
    pub location: GeoPoint,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerProfile {
    pub name: String,
    pub street: String,
    pub city: String,
    pub location: GeoPoint,
}

impl Partner {
    pub fn register(profile: PartnerProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: profile.name,
            street: profile.street,
            city: profile.city,
            location: profile.location,
            is_open: true,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Denormalized Partner Order Record
// ============================================================================
//
// The partner relay keeps its own order record, keyed by the same order id
// as the source row. It is written only from consumed events, never by the
// order API.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerOrder {
    pub order_id: Uuid,
    pub partner_id: Uuid,
    pub customer_id: Uuid,
    pub items: Vec<OrderItem>,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PartnerOrder {
    pub fn from_placed(e: &OrderPlaced) -> Self {
        Self {
            order_id: e.order_id,
            partner_id: e.partner_id,
            customer_id: e.customer_id,
            items: e.items.clone(),
            total_cents: e.total_cents,
            status: OrderStatus::Placed,
            placed_at: e.placed_at,
            updated_at: e.placed_at,
        }
    }

    /// The status this record should move to for a consumed event, if any.
    pub fn status_for(event: &DeliveryEvent) -> Option<OrderStatus> {
        match event {
            DeliveryEvent::OrderAccepted(_) => Some(OrderStatus::Accepted),
            DeliveryEvent::OrderRejected(_) => Some(OrderStatus::Rejected),
            DeliveryEvent::OrderReady(_) => Some(OrderStatus::Ready),
            DeliveryEvent::OrderPickedUp(_) => Some(OrderStatus::PickedUp),
            DeliveryEvent::OrderDelivered(_) => Some(OrderStatus::Delivered),
            DeliveryEvent::OrderPlaced(_)
            | DeliveryEvent::LocationUpdate(_)
            | DeliveryEvent::DriverArriving(_) => None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::model::DeliveryAddress;

    #[test]
    fn test_partner_order_mirrors_placed_event() {
        let e = OrderPlaced {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            items: vec![OrderItem {
                name: "Pad Thai".to_string(),
                unit_price_cents: 1_290,
                quantity: 1,
            }],
            address: DeliveryAddress {
                street: "1 Main St".to_string(),
                city: "Lyon".to_string(),
                postal_code: "69001".to_string(),
            },
            subtotal_cents: 1_290,
            delivery_fee_cents: 200,
            total_cents: 1_490,
            placed_at: Utc::now(),
        };

        let record = PartnerOrder::from_placed(&e);
        assert_eq!(record.order_id, e.order_id);
        assert_eq!(record.total_cents, 1_490);
        assert_eq!(record.status, OrderStatus::Placed);
    }

    #[test]
    fn test_status_for_tracks_lifecycle_only() {
        let accepted = DeliveryEvent::OrderAccepted(crate::domain::events::OrderAccepted {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            eta_minutes: None,
            accepted_at: Utc::now(),
        });
        assert_eq!(
            PartnerOrder::status_for(&accepted),
            Some(OrderStatus::Accepted)
        );

        let location = DeliveryEvent::LocationUpdate(crate::domain::events::LocationUpdate {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            location: GeoPoint::new(45.76, 4.84),
            recorded_at: Utc::now(),
        });
        assert_eq!(PartnerOrder::status_for(&location), None);
    }
}
