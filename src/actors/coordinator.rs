use actix::prelude::*;
use std::sync::Arc;

use crate::domain::notification::Role;
use crate::gateway::{topics_for_role, ConnectionRegistry, PushRelay};
use crate::messaging::{spawn_consumer, EventPublisher};
use crate::store::{AgentStore, NotificationStore, PartnerOrderStore};

use super::courier_sim::{CourierSimActor, SimConfig};
use super::health_monitor::{
    GetSystemHealth, HealthMonitorActor, HealthStatus, UpdateHealth,
};
use super::notifier::NotifierActor;
use super::partner_relay::PartnerRelayActor;

// ============================================================================
// Coordinator Actor - Orchestrates the consumer subsystems
// ============================================================================
//
// Responsibilities:
// - Starts and holds the relay actors (partner relay, notifier, courier sim)
// - Spawns the per-role gateway push consumers
// - Reports subsystem health and logs the aggregate on an interval
// - Coordinates graceful shutdown
//
// Actor hierarchy:
//   CoordinatorActor
//   ├── PartnerRelayActor
//   ├── NotifierActor
//   ├── CourierSimActor
//   └── gateway push consumers (plain tasks; the registry is shared with
//       the HTTP layer and owned outside this hierarchy)
//
// ============================================================================

pub struct CoordinatorActor {
    brokers: String,
    publisher: Arc<EventPublisher>,
    partner_orders: PartnerOrderStore,
    notifications: NotificationStore,
    agents: AgentStore,
    sim_config: SimConfig,
    registry: Addr<ConnectionRegistry>,
    health: Addr<HealthMonitorActor>,
    partner_relay: Option<Addr<PartnerRelayActor>>,
    notifier: Option<Addr<NotifierActor>>,
    courier_sim: Option<Addr<CourierSimActor>>,
    push_consumers: Vec<tokio::task::JoinHandle<()>>,
}

impl CoordinatorActor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        brokers: String,
        publisher: Arc<EventPublisher>,
        partner_orders: PartnerOrderStore,
        notifications: NotificationStore,
        agents: AgentStore,
        sim_config: SimConfig,
        registry: Addr<ConnectionRegistry>,
        health: Addr<HealthMonitorActor>,
    ) -> Self {
        Self {
            brokers,
            publisher,
            partner_orders,
            notifications,
            agents,
            sim_config,
            registry,
            health,
            partner_relay: None,
            notifier: None,
            courier_sim: None,
            push_consumers: Vec::new(),
        }
    }

    fn start_children(&mut self) {
        tracing::info!("Starting supervised consumer subsystems");

        self.partner_relay = Some(
            PartnerRelayActor::new(
                self.brokers.clone(),
                self.partner_orders.clone(),
                self.health.clone(),
            )
            .start(),
        );

        self.notifier = Some(
            NotifierActor::new(
                self.brokers.clone(),
                self.notifications.clone(),
                self.health.clone(),
            )
            .start(),
        );

        self.courier_sim = Some(
            CourierSimActor::new(
                self.brokers.clone(),
                self.publisher.clone(),
                self.agents.clone(),
                self.sim_config.clone(),
                self.health.clone(),
            )
            .start(),
        );

        for role in [Role::Customer, Role::Partner, Role::Agent] {
            let group = PushRelay::consumer_group(role);
            let relay = PushRelay::new(role, self.registry.clone());

            match spawn_consumer(&self.brokers, &group, topics_for_role(role), relay) {
                Ok(handle) => {
                    self.push_consumers.push(handle);
                    self.health.do_send(UpdateHealth {
                        component: group,
                        status: HealthStatus::Healthy,
                    });
                }
                Err(e) => {
                    tracing::error!(group = %group, error = %e, "Failed to start push consumer");
                    self.health.do_send(UpdateHealth {
                        component: group,
                        status: HealthStatus::Unhealthy(e.to_string()),
                    });
                }
            }
        }

        tracing::info!("All consumer subsystems started");
    }
}

impl Actor for CoordinatorActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("CoordinatorActor started");
        self.start_children();

        // Periodic aggregate health log.
        ctx.run_interval(std::time::Duration::from_secs(30), |act, _ctx| {
            let health = act.health.clone();
            actix::spawn(async move {
                match health.send(GetSystemHealth).await {
                    Ok(snapshot) => match snapshot.overall_status {
                        HealthStatus::Healthy => {
                            tracing::debug!("System health check: healthy");
                        }
                        HealthStatus::Degraded(ref msg) => {
                            tracing::warn!(detail = %msg, "System health check: degraded");
                        }
                        HealthStatus::Unhealthy(ref msg) => {
                            tracing::error!(detail = %msg, "System health check: unhealthy");
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to query system health");
                    }
                }
            });
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        tracing::info!("CoordinatorActor stopping, shutting down subsystems");
        Running::Stop
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        for handle in self.push_consumers.drain(..) {
            handle.abort();
        }
        tracing::info!("CoordinatorActor stopped");
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

impl Handler<Shutdown> for CoordinatorActor {
    type Result = ();

    fn handle(&mut self, _: Shutdown, ctx: &mut Self::Context) {
        tracing::info!("Received shutdown signal");

        if let Some(ref partner_relay) = self.partner_relay {
            partner_relay.do_send(StopActor);
        }
        if let Some(ref notifier) = self.notifier {
            notifier.do_send(StopActor);
        }
        if let Some(ref courier_sim) = self.courier_sim {
            courier_sim.do_send(StopActor);
        }

        ctx.stop();
    }
}

/// Gracefully stops a child actor.
#[derive(Message)]
#[rtype(result = "()")]
struct StopActor;

impl Handler<StopActor> for PartnerRelayActor {
    type Result = ();

    fn handle(&mut self, _: StopActor, ctx: &mut Self::Context) {
        ctx.stop();
    }
}

impl Handler<StopActor> for NotifierActor {
    type Result = ();

    fn handle(&mut self, _: StopActor, ctx: &mut Self::Context) {
        ctx.stop();
    }
}

impl Handler<StopActor> for CourierSimActor {
    type Result = ();

    fn handle(&mut self, _: StopActor, ctx: &mut Self::Context) {
        ctx.stop();
    }
}
