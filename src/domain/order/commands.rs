use uuid::Uuid;

use super::model::{DeliveryAddress, OrderItem};

// ============================================================================
// Order Commands - Represent caller intent
// ============================================================================

/// Creates a new order. Handled by [`super::model::Order::place`].
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub items: Vec<OrderItem>,
    pub address: DeliveryAddress,
    pub delivery_fee_cents: i64,
}

/// Lifecycle transitions on an existing order.
#[derive(Debug, Clone)]
pub enum OrderCommand {
    Accept {
        eta_minutes: Option<u32>,
    },
    Reject {
        reason: Option<String>,
    },
    MarkReady,
    PickUp {
        agent_id: Uuid,
    },
    Deliver,
}
