use actix::prelude::*;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::notification::Notification;
use crate::messaging::{spawn_consumer, topics, BusEnvelope, EventHandler};
use crate::store::NotificationStore;

use super::health_monitor::{HealthMonitorActor, HealthStatus, UpdateHealth};

// ============================================================================
// Notifier Actor
// ============================================================================
//
// Consumes the order lifecycle topics plus driver-arriving and writes one
// notification row per affected party. Redelivered events produce duplicate
// rows; nothing on this path deduplicates.
//
// ============================================================================

const CONSUMER_GROUP: &str = "notifier";

const TOPICS: &[&str] = &[
    topics::ORDER_CREATED,
    topics::ORDER_ACCEPTED,
    topics::ORDER_REJECTED,
    topics::ORDER_READY,
    topics::ORDER_PICKEDUP,
    topics::ORDER_DELIVERED,
    topics::DRIVER_ARRIVING,
];

struct NotifierHandler {
    store: NotificationStore,
}

#[async_trait]
impl EventHandler for NotifierHandler {
    async fn handle(&mut self, envelope: BusEnvelope) -> Result<()> {
        for notification in Notification::fan_out(&envelope.event_data) {
            self.store.insert(&notification).await?;

            tracing::info!(
                recipient_id = %notification.recipient_id,
                role = notification.recipient_role.as_str(),
                order_id = %notification.order_id,
                event_type = %envelope.event_type,
                "Notification stored"
            );
        }

        Ok(())
    }
}

pub struct NotifierActor {
    brokers: String,
    store: NotificationStore,
    health: Addr<HealthMonitorActor>,
    consumer: Option<tokio::task::JoinHandle<()>>,
}

impl NotifierActor {
    pub fn new(
        brokers: String,
        store: NotificationStore,
        health: Addr<HealthMonitorActor>,
    ) -> Self {
        Self {
            brokers,
            store,
            health,
            consumer: None,
        }
    }
}

impl Actor for NotifierActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        let handler = NotifierHandler {
            store: self.store.clone(),
        };

        match spawn_consumer(&self.brokers, CONSUMER_GROUP, TOPICS, handler) {
            Ok(handle) => {
                self.consumer = Some(handle);
                self.health.do_send(UpdateHealth {
                    component: CONSUMER_GROUP.to_string(),
                    status: HealthStatus::Healthy,
                });
                tracing::info!("NotifierActor started");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to start notifier consumer");
                self.health.do_send(UpdateHealth {
                    component: CONSUMER_GROUP.to_string(),
                    status: HealthStatus::Unhealthy(e.to_string()),
                });
            }
        }
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        if let Some(handle) = self.consumer.take() {
            handle.abort();
        }
        tracing::info!("NotifierActor stopped");
    }
}
