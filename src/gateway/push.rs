use actix::prelude::*;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::events::DeliveryEvent;
use crate::domain::notification::Role;
use crate::messaging::{topics, BusEnvelope, EventHandler};

use super::registry::{Broadcast, ConnectionRegistry, Push};

// ============================================================================
// Push Relay - bus events to websocket frames
// ============================================================================
//
// One relay per gateway role, each in its own consumer group, mirroring the
// per-role websocket services of the deployment: partners see incoming
// orders, customers follow their order and its courier, agents see ready
// orders and their own pickups.
//
// ============================================================================

/// The topics a gateway role subscribes to.
pub fn topics_for_role(role: Role) -> &'static [&'static str] {
    match role {
        Role::Customer => &[
            topics::ORDER_ACCEPTED,
            topics::ORDER_REJECTED,
            topics::ORDER_READY,
            topics::ORDER_PICKEDUP,
            topics::ORDER_DELIVERED,
            topics::LOCATION_UPDATE,
            topics::DRIVER_ARRIVING,
        ],
        Role::Partner => &[topics::ORDER_CREATED],
        Role::Agent => &[
            topics::ORDER_READY,
            topics::ORDER_PICKEDUP,
            topics::ORDER_DELIVERED,
        ],
    }
}

/// Where a frame goes for a given role and event, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PushTarget {
    User(Uuid),
    AllConnected,
}

pub fn target_for(role: Role, event: &DeliveryEvent) -> Option<PushTarget> {
    match role {
        Role::Customer => match event {
            DeliveryEvent::OrderAccepted(e) => Some(PushTarget::User(e.customer_id)),
            DeliveryEvent::OrderRejected(e) => Some(PushTarget::User(e.customer_id)),
            DeliveryEvent::OrderReady(e) => Some(PushTarget::User(e.customer_id)),
            DeliveryEvent::OrderPickedUp(e) => Some(PushTarget::User(e.customer_id)),
            DeliveryEvent::OrderDelivered(e) => Some(PushTarget::User(e.customer_id)),
            DeliveryEvent::LocationUpdate(e) => Some(PushTarget::User(e.customer_id)),
            DeliveryEvent::DriverArriving(e) => Some(PushTarget::User(e.customer_id)),
            DeliveryEvent::OrderPlaced(_) => None,
        },
        Role::Partner => match event {
            DeliveryEvent::OrderPlaced(e) => Some(PushTarget::User(e.partner_id)),
            _ => None,
        },
        Role::Agent => match event {
            // Every connected agent sees orders waiting for a courier.
            DeliveryEvent::OrderReady(_) => Some(PushTarget::AllConnected),
            DeliveryEvent::OrderPickedUp(e) => Some(PushTarget::User(e.agent_id)),
            DeliveryEvent::OrderDelivered(e) => Some(PushTarget::User(e.agent_id)),
            _ => None,
        },
    }
}

pub struct PushRelay {
    role: Role,
    registry: Addr<ConnectionRegistry>,
}

impl PushRelay {
    pub fn new(role: Role, registry: Addr<ConnectionRegistry>) -> Self {
        Self { role, registry }
    }

    pub fn consumer_group(role: Role) -> String {
        format!("gateway-{}", role.as_str())
    }
}

#[async_trait]
impl EventHandler for PushRelay {
    async fn handle(&mut self, envelope: BusEnvelope) -> Result<()> {
        let Some(target) = target_for(self.role, &envelope.event_data) else {
            return Ok(());
        };

        let frame = envelope.to_json()?;
        match target {
            PushTarget::User(user_id) => self.registry.do_send(Push {
                role: self.role,
                user_id,
                frame,
            }),
            PushTarget::AllConnected => self.registry.do_send(Broadcast {
                role: self.role,
                frame,
            }),
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{LocationUpdate, OrderPlaced, OrderReady};
    use crate::domain::geo::GeoPoint;
    use crate::domain::order::model::DeliveryAddress;
    use chrono::Utc;

    fn placed() -> DeliveryEvent {
        DeliveryEvent::OrderPlaced(OrderPlaced {
            order_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            items: vec![],
            address: DeliveryAddress {
                street: "1 Main St".to_string(),
                city: "Lyon".to_string(),
                postal_code: "69001".to_string(),
            },
            subtotal_cents: 0,
            delivery_fee_cents: 0,
            total_cents: 0,
            placed_at: Utc::now(),
        })
    }

    #[test]
    fn test_placed_goes_to_partner_only() {
        let event = placed();
        let partner_id = match &event {
            DeliveryEvent::OrderPlaced(e) => e.partner_id,
            _ => unreachable!(),
        };

        assert_eq!(
            target_for(Role::Partner, &event),
            Some(PushTarget::User(partner_id))
        );
        assert_eq!(target_for(Role::Customer, &event), None);
        assert_eq!(target_for(Role::Agent, &event), None);
    }

    #[test]
    fn test_ready_broadcasts_to_agents() {
        let customer_id = Uuid::new_v4();
        let event = DeliveryEvent::OrderReady(OrderReady {
            order_id: Uuid::new_v4(),
            customer_id,
            partner_id: Uuid::new_v4(),
            ready_at: Utc::now(),
        });

        assert_eq!(
            target_for(Role::Agent, &event),
            Some(PushTarget::AllConnected)
        );
        assert_eq!(
            target_for(Role::Customer, &event),
            Some(PushTarget::User(customer_id))
        );
    }

    #[test]
    fn test_location_updates_go_to_customer() {
        let customer_id = Uuid::new_v4();
        let event = DeliveryEvent::LocationUpdate(LocationUpdate {
            order_id: Uuid::new_v4(),
            customer_id,
            agent_id: Uuid::new_v4(),
            location: GeoPoint::new(45.76, 4.84),
            recorded_at: Utc::now(),
        });

        assert_eq!(
            target_for(Role::Customer, &event),
            Some(PushTarget::User(customer_id))
        );
        assert_eq!(target_for(Role::Partner, &event), None);
    }

    #[test]
    fn test_role_topic_sets_match_routing() {
        // A topic a role subscribes to must route somewhere for at least one
        // event shape; partner's single topic is the placement topic.
        assert_eq!(topics_for_role(Role::Partner), &[topics::ORDER_CREATED][..]);
        assert!(topics_for_role(Role::Customer).contains(&topics::DRIVER_ARRIVING));
        assert!(topics_for_role(Role::Agent).contains(&topics::ORDER_READY));
    }
}
