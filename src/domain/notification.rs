use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::DeliveryEvent;

// ============================================================================
// Notification Model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Partner,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Partner => "partner",
            Role::Agent => "agent",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "partner" => Ok(Role::Partner),
            "agent" => Ok(Role::Agent),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub recipient_role: Role,
    pub order_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient_id: Uuid, recipient_role: Role, order_id: Uuid, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            recipient_role,
            order_id,
            message,
            created_at: Utc::now(),
        }
    }

    /// The notification rows a single bus event fans out to. Location pings
    /// are websocket-only and produce no rows.
    pub fn fan_out(event: &DeliveryEvent) -> Vec<Notification> {
        match event {
            DeliveryEvent::OrderPlaced(e) => vec![Notification::new(
                e.partner_id,
                Role::Partner,
                e.order_id,
                format!(
                    "New order: {} item(s), {} cents total",
                    e.items.len(),
                    e.total_cents
                ),
            )],
            DeliveryEvent::OrderAccepted(e) => {
                let message = match e.eta_minutes {
                    Some(eta) => format!("Your order was accepted, ready in about {eta} min"),
                    None => "Your order was accepted".to_string(),
                };
                vec![Notification::new(
                    e.customer_id,
                    Role::Customer,
                    e.order_id,
                    message,
                )]
            }
            DeliveryEvent::OrderRejected(e) => {
                let message = match &e.reason {
                    Some(reason) => format!("Your order was rejected: {reason}"),
                    None => "Your order was rejected".to_string(),
                };
                vec![Notification::new(
                    e.customer_id,
                    Role::Customer,
                    e.order_id,
                    message,
                )]
            }
            DeliveryEvent::OrderReady(e) => vec![Notification::new(
                e.customer_id,
                Role::Customer,
                e.order_id,
                "Your order is ready and waiting for a courier".to_string(),
            )],
            DeliveryEvent::OrderPickedUp(e) => vec![
                Notification::new(
                    e.customer_id,
                    Role::Customer,
                    e.order_id,
                    "Your order is on its way".to_string(),
                ),
                Notification::new(
                    e.partner_id,
                    Role::Partner,
                    e.order_id,
                    "Order picked up by courier".to_string(),
                ),
            ],
            DeliveryEvent::OrderDelivered(e) => vec![
                Notification::new(
                    e.customer_id,
                    Role::Customer,
                    e.order_id,
                    "Your order has been delivered".to_string(),
                ),
                Notification::new(
                    e.agent_id,
                    Role::Agent,
                    e.order_id,
                    "Delivery completed".to_string(),
                ),
            ],
            DeliveryEvent::DriverArriving(e) => vec![Notification::new(
                e.customer_id,
                Role::Customer,
                e.order_id,
                "Your courier is arriving".to_string(),
            )],
            DeliveryEvent::LocationUpdate(_) => Vec::new(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{OrderAccepted, OrderDelivered, LocationUpdate};
    use crate::domain::geo::GeoPoint;

    #[test]
    fn test_accepted_notifies_customer_only() {
        let customer_id = Uuid::new_v4();
        let event = DeliveryEvent::OrderAccepted(OrderAccepted {
            order_id: Uuid::new_v4(),
            customer_id,
            partner_id: Uuid::new_v4(),
            eta_minutes: Some(30),
            accepted_at: Utc::now(),
        });

        let rows = Notification::fan_out(&event);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].recipient_id, customer_id);
        assert_eq!(rows[0].recipient_role, Role::Customer);
        assert!(rows[0].message.contains("30"));
    }

    #[test]
    fn test_delivered_notifies_customer_and_agent() {
        let event = DeliveryEvent::OrderDelivered(OrderDelivered {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            delivered_at: Utc::now(),
        });

        let roles: Vec<Role> = Notification::fan_out(&event)
            .iter()
            .map(|n| n.recipient_role)
            .collect();
        assert_eq!(roles, vec![Role::Customer, Role::Agent]);
    }

    #[test]
    fn test_location_updates_produce_no_rows() {
        let event = DeliveryEvent::LocationUpdate(LocationUpdate {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            location: GeoPoint::new(45.76, 4.84),
            recorded_at: Utc::now(),
        });
        assert!(Notification::fan_out(&event).is_empty());
    }

    #[test]
    fn test_role_string_round_trip() {
        for role in [Role::Customer, Role::Partner, Role::Agent] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }
}
