use super::model::OrderStatus;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order items cannot be empty")]
    EmptyItems,

    #[error("Invalid item quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Invalid item price: {0}")]
    InvalidPrice(i64),

    #[error("Invalid delivery fee: {0}")]
    InvalidDeliveryFee(i64),

    #[error("Delivery address cannot be blank")]
    BlankAddress,

    #[error("Order has already been decided, current status: {0:?}")]
    AlreadyDecided(OrderStatus),

    #[error("Order must be accepted before it is ready, current status: {0:?}")]
    NotAccepted(OrderStatus),

    #[error("Order must be ready before pickup, current status: {0:?}")]
    NotReady(OrderStatus),

    #[error("Order must be picked up before delivery, current status: {0:?}")]
    NotPickedUp(OrderStatus),
}
