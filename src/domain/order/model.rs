use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::events::{
    DeliveryEvent, OrderAccepted, OrderDelivered, OrderPickedUp, OrderPlaced, OrderReady,
    OrderRejected,
};

use super::commands::{OrderCommand, PlaceOrder};
use super::errors::OrderError;

// ============================================================================
// Order Value Objects
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl DeliveryAddress {
    pub fn is_blank(&self) -> bool {
        self.street.trim().is_empty()
            || self.city.trim().is_empty()
            || self.postal_code.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    Accepted,
    Rejected,
    Ready,
    PickedUp,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::Ready => "Ready",
            OrderStatus::PickedUp => "PickedUp",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Rejected | OrderStatus::Delivered)
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Placed" => Ok(OrderStatus::Placed),
            "Accepted" => Ok(OrderStatus::Accepted),
            "Rejected" => Ok(OrderStatus::Rejected),
            "Ready" => Ok(OrderStatus::Ready),
            "PickedUp" => Ok(OrderStatus::PickedUp),
            "Delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("Unknown order status: {other}")),
        }
    }
}

// ============================================================================
// Order Model - Lifecycle State Machine
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub address: DeliveryAddress,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Validate a creation request and build the order plus its placement
    /// event. Fee fields are derived here and never recomputed afterwards.
    pub fn place(cmd: PlaceOrder) -> Result<(Self, DeliveryEvent), OrderError> {
        Self::validate_items(&cmd.items)?;

        if cmd.address.is_blank() {
            return Err(OrderError::BlankAddress);
        }
        if cmd.delivery_fee_cents < 0 {
            return Err(OrderError::InvalidDeliveryFee(cmd.delivery_fee_cents));
        }

        let subtotal_cents: i64 = cmd
            .items
            .iter()
            .map(|item| item.unit_price_cents * i64::from(item.quantity))
            .sum();
        let total_cents = subtotal_cents + cmd.delivery_fee_cents;

        let now = Utc::now();
        let order = Self {
            id: Uuid::new_v4(),
            customer_id: cmd.customer_id,
            partner_id: cmd.partner_id,
            agent_id: None,
            address: cmd.address,
            items: cmd.items,
            subtotal_cents,
            delivery_fee_cents: cmd.delivery_fee_cents,
            total_cents,
            status: OrderStatus::Placed,
            created_at: now,
            updated_at: now,
        };

        let event = DeliveryEvent::OrderPlaced(OrderPlaced {
            order_id: order.id,
            customer_id: order.customer_id,
            partner_id: order.partner_id,
            items: order.items.clone(),
            address: order.address.clone(),
            subtotal_cents: order.subtotal_cents,
            delivery_fee_cents: order.delivery_fee_cents,
            total_cents: order.total_cents,
            placed_at: now,
        });

        Ok((order, event))
    }

    fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyItems);
        }
        for item in items {
            if item.quantity <= 0 {
                return Err(OrderError::InvalidQuantity(item.quantity));
            }
            if item.unit_price_cents < 0 {
                return Err(OrderError::InvalidPrice(item.unit_price_cents));
            }
        }
        Ok(())
    }

    /// Validate a lifecycle transition against the current status and emit
    /// the corresponding event. State is not mutated here; callers apply the
    /// event after it has been persisted.
    pub fn handle(&self, command: &OrderCommand) -> Result<DeliveryEvent, OrderError> {
        match command {
            OrderCommand::Accept { eta_minutes } => {
                match self.status {
                    OrderStatus::Placed => {}
                    other => return Err(OrderError::AlreadyDecided(other)),
                }

                Ok(DeliveryEvent::OrderAccepted(OrderAccepted {
                    order_id: self.id,
                    customer_id: self.customer_id,
                    partner_id: self.partner_id,
                    eta_minutes: *eta_minutes,
                    accepted_at: Utc::now(),
                }))
            }

            OrderCommand::Reject { reason } => {
                match self.status {
                    OrderStatus::Placed => {}
                    other => return Err(OrderError::AlreadyDecided(other)),
                }

                Ok(DeliveryEvent::OrderRejected(OrderRejected {
                    order_id: self.id,
                    customer_id: self.customer_id,
                    partner_id: self.partner_id,
                    reason: reason.clone(),
                    rejected_at: Utc::now(),
                }))
            }

            OrderCommand::MarkReady => {
                match self.status {
                    OrderStatus::Accepted => {}
                    other => return Err(OrderError::NotAccepted(other)),
                }

                Ok(DeliveryEvent::OrderReady(OrderReady {
                    order_id: self.id,
                    customer_id: self.customer_id,
                    partner_id: self.partner_id,
                    ready_at: Utc::now(),
                }))
            }

            OrderCommand::PickUp { agent_id } => {
                match self.status {
                    OrderStatus::Ready => {}
                    other => return Err(OrderError::NotReady(other)),
                }

                Ok(DeliveryEvent::OrderPickedUp(OrderPickedUp {
                    order_id: self.id,
                    customer_id: self.customer_id,
                    partner_id: self.partner_id,
                    agent_id: *agent_id,
                    picked_up_at: Utc::now(),
                }))
            }

            OrderCommand::Deliver => {
                let agent_id = match (self.status, self.agent_id) {
                    (OrderStatus::PickedUp, Some(agent_id)) => agent_id,
                    (other, _) => return Err(OrderError::NotPickedUp(other)),
                };

                Ok(DeliveryEvent::OrderDelivered(OrderDelivered {
                    order_id: self.id,
                    customer_id: self.customer_id,
                    partner_id: self.partner_id,
                    agent_id,
                    delivered_at: Utc::now(),
                }))
            }
        }
    }

    /// Fold a lifecycle event into the order. Tracking events carry no order
    /// state and are ignored.
    pub fn apply(&mut self, event: &DeliveryEvent) {
        match event {
            DeliveryEvent::OrderAccepted(e) => {
                self.status = OrderStatus::Accepted;
                self.updated_at = e.accepted_at;
            }
            DeliveryEvent::OrderRejected(e) => {
                self.status = OrderStatus::Rejected;
                self.updated_at = e.rejected_at;
            }
            DeliveryEvent::OrderReady(e) => {
                self.status = OrderStatus::Ready;
                self.updated_at = e.ready_at;
            }
            DeliveryEvent::OrderPickedUp(e) => {
                self.status = OrderStatus::PickedUp;
                self.agent_id = Some(e.agent_id);
                self.updated_at = e.picked_up_at;
            }
            DeliveryEvent::OrderDelivered(e) => {
                self.status = OrderStatus::Delivered;
                self.updated_at = e.delivered_at;
            }
            DeliveryEvent::OrderPlaced(_)
            | DeliveryEvent::LocationUpdate(_)
            | DeliveryEvent::DriverArriving(_) => {}
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_place() -> PlaceOrder {
        PlaceOrder {
            customer_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            items: vec![
                OrderItem {
                    name: "Margherita".to_string(),
                    unit_price_cents: 1_150,
                    quantity: 2,
                },
                OrderItem {
                    name: "Tiramisu".to_string(),
                    unit_price_cents: 650,
                    quantity: 1,
                },
            ],
            address: DeliveryAddress {
                street: "12 Rue des Oliviers".to_string(),
                city: "Lyon".to_string(),
                postal_code: "69003".to_string(),
            },
            delivery_fee_cents: 299,
        }
    }

    fn placed_order() -> Order {
        Order::place(sample_place()).unwrap().0
    }

    #[test]
    fn test_place_computes_fee_fields() {
        let (order, event) = Order::place(sample_place()).unwrap();

        assert_eq!(order.subtotal_cents, 2 * 1_150 + 650);
        assert_eq!(order.total_cents, order.subtotal_cents + 299);
        assert_eq!(order.status, OrderStatus::Placed);
        assert!(order.agent_id.is_none());

        match event {
            DeliveryEvent::OrderPlaced(e) => {
                assert_eq!(e.order_id, order.id);
                assert_eq!(e.total_cents, order.total_cents);
            }
            other => panic!("expected OrderPlaced, got {}", other.event_type()),
        }
    }

    #[test]
    fn test_place_rejects_empty_items() {
        let mut cmd = sample_place();
        cmd.items.clear();
        assert!(matches!(Order::place(cmd), Err(OrderError::EmptyItems)));
    }

    #[test]
    fn test_place_rejects_nonpositive_quantity() {
        let mut cmd = sample_place();
        cmd.items[0].quantity = 0;
        assert!(matches!(
            Order::place(cmd),
            Err(OrderError::InvalidQuantity(0))
        ));
    }

    #[test]
    fn test_place_rejects_blank_address() {
        let mut cmd = sample_place();
        cmd.address.city = "   ".to_string();
        assert!(matches!(Order::place(cmd), Err(OrderError::BlankAddress)));
    }

    #[test]
    fn test_full_lifecycle_happy_path() {
        let mut order = placed_order();
        let agent_id = Uuid::new_v4();

        let accepted = order
            .handle(&OrderCommand::Accept {
                eta_minutes: Some(25),
            })
            .unwrap();
        order.apply(&accepted);
        assert_eq!(order.status, OrderStatus::Accepted);

        let ready = order.handle(&OrderCommand::MarkReady).unwrap();
        order.apply(&ready);
        assert_eq!(order.status, OrderStatus::Ready);

        let picked = order.handle(&OrderCommand::PickUp { agent_id }).unwrap();
        order.apply(&picked);
        assert_eq!(order.status, OrderStatus::PickedUp);
        assert_eq!(order.agent_id, Some(agent_id));

        let delivered = order.handle(&OrderCommand::Deliver).unwrap();
        order.apply(&delivered);
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.status.is_terminal());
    }

    #[test]
    fn test_reject_ends_lifecycle() {
        let mut order = placed_order();
        let rejected = order
            .handle(&OrderCommand::Reject {
                reason: Some("Kitchen closed".to_string()),
            })
            .unwrap();
        order.apply(&rejected);

        assert_eq!(order.status, OrderStatus::Rejected);
        assert!(matches!(
            order.handle(&OrderCommand::Accept { eta_minutes: None }),
            Err(OrderError::AlreadyDecided(OrderStatus::Rejected))
        ));
    }

    #[test]
    fn test_second_accept_conflicts() {
        let mut order = placed_order();
        let accepted = order.handle(&OrderCommand::Accept { eta_minutes: None }).unwrap();
        order.apply(&accepted);

        assert!(matches!(
            order.handle(&OrderCommand::Accept { eta_minutes: None }),
            Err(OrderError::AlreadyDecided(OrderStatus::Accepted))
        ));
    }

    #[test]
    fn test_pickup_requires_ready() {
        let order = placed_order();
        assert!(matches!(
            order.handle(&OrderCommand::PickUp {
                agent_id: Uuid::new_v4()
            }),
            Err(OrderError::NotReady(OrderStatus::Placed))
        ));
    }

    #[test]
    fn test_second_pickup_conflicts() {
        let mut order = placed_order();
        for cmd in [
            OrderCommand::Accept { eta_minutes: None },
            OrderCommand::MarkReady,
            OrderCommand::PickUp {
                agent_id: Uuid::new_v4(),
            },
        ] {
            let event = order.handle(&cmd).unwrap();
            order.apply(&event);
        }

        assert!(matches!(
            order.handle(&OrderCommand::PickUp {
                agent_id: Uuid::new_v4()
            }),
            Err(OrderError::NotReady(OrderStatus::PickedUp))
        ));
    }

    #[test]
    fn test_deliver_requires_pickup() {
        let order = placed_order();
        assert!(matches!(
            order.handle(&OrderCommand::Deliver),
            Err(OrderError::NotPickedUp(OrderStatus::Placed))
        ));
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            OrderStatus::Placed,
            OrderStatus::Accepted,
            OrderStatus::Rejected,
            OrderStatus::Ready,
            OrderStatus::PickedUp,
            OrderStatus::Delivered,
        ] {
            let parsed: OrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
