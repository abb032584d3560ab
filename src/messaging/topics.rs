use crate::domain::events::DeliveryEvent;

// ============================================================================
// Topic Names - one topic per event type
// ============================================================================

pub const ORDER_CREATED: &str = "order-created";
pub const ORDER_ACCEPTED: &str = "order-accepted";
pub const ORDER_REJECTED: &str = "order-rejected";
pub const ORDER_READY: &str = "order-ready";
pub const ORDER_PICKEDUP: &str = "order-pickedup";
pub const ORDER_DELIVERED: &str = "order-delivered";
pub const LOCATION_UPDATE: &str = "location-update";
pub const DRIVER_ARRIVING: &str = "driver-arriving";

/// Every order lifecycle topic, in lifecycle order.
pub const ORDER_LIFECYCLE: &[&str] = &[
    ORDER_CREATED,
    ORDER_ACCEPTED,
    ORDER_REJECTED,
    ORDER_READY,
    ORDER_PICKEDUP,
    ORDER_DELIVERED,
];

pub fn topic_for(event: &DeliveryEvent) -> &'static str {
    match event {
        DeliveryEvent::OrderPlaced(_) => ORDER_CREATED,
        DeliveryEvent::OrderAccepted(_) => ORDER_ACCEPTED,
        DeliveryEvent::OrderRejected(_) => ORDER_REJECTED,
        DeliveryEvent::OrderReady(_) => ORDER_READY,
        DeliveryEvent::OrderPickedUp(_) => ORDER_PICKEDUP,
        DeliveryEvent::OrderDelivered(_) => ORDER_DELIVERED,
        DeliveryEvent::LocationUpdate(_) => LOCATION_UPDATE,
        DeliveryEvent::DriverArriving(_) => DRIVER_ARRIVING,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::OrderReady;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_lifecycle_topics_are_distinct() {
        let mut topics = ORDER_LIFECYCLE.to_vec();
        topics.sort_unstable();
        topics.dedup();
        assert_eq!(topics.len(), ORDER_LIFECYCLE.len());
    }

    #[test]
    fn test_topic_for_ready_event() {
        let id = Uuid::new_v4();
        let event = DeliveryEvent::OrderReady(OrderReady {
            order_id: id,
            customer_id: id,
            partner_id: id,
            ready_at: Utc::now(),
        });
        assert_eq!(topic_for(&event), ORDER_READY);
    }
}
