use actix::Addr;
use std::sync::Arc;

use crate::actors::HealthMonitorActor;
use crate::domain::events::DeliveryEvent;
use crate::gateway::ConnectionRegistry;
use crate::messaging::{BusEnvelope, EventPublisher};
use crate::store::{
    AgentStore, CustomerStore, FeedbackStore, NotificationStore, OrderStore, PartnerOrderStore,
    PartnerStore,
};

// ============================================================================
// Shared Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderStore,
    pub partners: PartnerStore,
    pub partner_orders: PartnerOrderStore,
    pub agents: AgentStore,
    pub customers: CustomerStore,
    pub feedback: FeedbackStore,
    pub notifications: NotificationStore,
    pub publisher: Arc<EventPublisher>,
    pub registry: Addr<ConnectionRegistry>,
    pub health: Addr<HealthMonitorActor>,
}

impl AppState {
    /// Publish after the row is committed. The relay is catch-log-continue
    /// end to end: a publish failure is logged, not surfaced to the caller,
    /// and the event is not retried.
    pub async fn publish(&self, event: DeliveryEvent, correlation_id: uuid::Uuid) {
        let envelope = BusEnvelope::wrap(event, correlation_id);
        if let Err(e) = self.publisher.publish(&envelope).await {
            tracing::error!(
                order_id = %envelope.order_id,
                event_type = %envelope.event_type,
                error = %e,
                "Event publish failed, consumers will not see this event"
            );
        }
    }
}
