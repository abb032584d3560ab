use actix::prelude::*;
use anyhow::Result;
use async_trait::async_trait;

use crate::domain::events::DeliveryEvent;
use crate::domain::partner::PartnerOrder;
use crate::messaging::{spawn_consumer, topics, BusEnvelope, EventHandler};
use crate::store::PartnerOrderStore;

use super::health_monitor::{HealthMonitorActor, HealthStatus, UpdateHealth};

// ============================================================================
// Partner Relay Actor
// ============================================================================
//
// Consumes the order lifecycle topics and maintains the partner-side
// denormalized order records: a new row per placed order, a status update
// per later event. This is the only writer of partner_orders.
//
// ============================================================================

const CONSUMER_GROUP: &str = "partner-relay";

struct PartnerRelayHandler {
    store: PartnerOrderStore,
}

#[async_trait]
impl EventHandler for PartnerRelayHandler {
    async fn handle(&mut self, envelope: BusEnvelope) -> Result<()> {
        match &envelope.event_data {
            DeliveryEvent::OrderPlaced(e) => {
                let record = PartnerOrder::from_placed(e);
                self.store.upsert_placed(&record).await?;

                tracing::info!(
                    order_id = %record.order_id,
                    partner_id = %record.partner_id,
                    "Stored partner order record"
                );
            }
            event => {
                let Some(status) = PartnerOrder::status_for(event) else {
                    return Ok(());
                };

                let updated = self
                    .store
                    .set_status(envelope.order_id, status, envelope.timestamp)
                    .await?;

                if updated {
                    tracing::info!(
                        order_id = %envelope.order_id,
                        status = status.as_str(),
                        "Updated partner order status"
                    );
                } else {
                    // The placement event may not have arrived yet, or was
                    // lost; there is nothing to update against.
                    tracing::warn!(
                        order_id = %envelope.order_id,
                        event_type = %envelope.event_type,
                        "No partner order record for event"
                    );
                }
            }
        }

        Ok(())
    }
}

pub struct PartnerRelayActor {
    brokers: String,
    store: PartnerOrderStore,
    health: Addr<HealthMonitorActor>,
    consumer: Option<tokio::task::JoinHandle<()>>,
}

impl PartnerRelayActor {
    pub fn new(
        brokers: String,
        store: PartnerOrderStore,
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

impl Actor for PartnerRelayActor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        let handler = PartnerRelayHandler {
            store: self.store.clone(),
        };

        match spawn_consumer(&self.brokers, CONSUMER_GROUP, topics::ORDER_LIFECYCLE, handler) {
            Ok(handle) => {
                self.consumer = Some(handle);
                self.health.do_send(UpdateHealth {
                    component: CONSUMER_GROUP.to_string(),
                    status: HealthStatus::Healthy,
                });
                tracing::info!("PartnerRelayActor started");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to start partner relay consumer");
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
        tracing::info!("PartnerRelayActor stopped");
    }
}
