use actix::prelude::*;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::events::{DeliveryEvent, DriverArriving, LocationUpdate};
use crate::domain::geo::GeoPoint;
use crate::messaging::{spawn_consumer, topics, BusEnvelope, EventHandler, EventPublisher};
use crate::store::AgentStore;

use super::health_monitor::{HealthMonitorActor, HealthStatus, UpdateHealth};

// ============================================================================
// Courier Simulator Actor
// ============================================================================
//
// Stands in for real courier GPS hardware. When an order is picked up it
// starts a simulated route: every tick the courier advances toward the drop
// point and a location-update is published; one driver-arriving is published
// when the courier enters the arrival radius. The route ends at the drop
// point, or early if the order is delivered first.
//
// Drop points are derived from the order id, so a route is reproducible
// without any geocoding.
//
// ============================================================================

const CONSUMER_GROUP: &str = "courier-sim";

#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Time between location pings
    pub tick: Duration,
    /// Distance covered per tick, meters
    pub speed_m_per_tick: f64,
    /// Radius around the drop point that counts as "arriving"
    pub arrival_radius_m: f64,
    /// Courier starting area; pickups begin near this point
    pub depot: GeoPoint,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(3),
            speed_m_per_tick: 120.0,
            arrival_radius_m: 150.0,
            depot: GeoPoint::new(45.7640, 4.8357),
        }
    }
}

/// Maximum offset of a generated drop point from the depot, degrees.
const DROP_SPREAD_DEG: f64 = 0.02;
/// Start jitter around the depot, degrees.
const START_JITTER_DEG: f64 = 0.005;

/// Deterministic drop point for an order: the id's leading bytes are mapped
/// into a square around the depot.
fn drop_point(depot: GeoPoint, order_id: Uuid) -> GeoPoint {
    let bytes = order_id.as_bytes();
    let lat_raw = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let lon_raw = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    let unit = |raw: u32| (f64::from(raw) / f64::from(u32::MAX)) * 2.0 - 1.0;

    GeoPoint::new(
        depot.lat + unit(lat_raw) * DROP_SPREAD_DEG,
        depot.lon + unit(lon_raw) * DROP_SPREAD_DEG,
    )
}

fn jittered_start(depot: GeoPoint) -> GeoPoint {
    let mut rng = rand::thread_rng();
    GeoPoint::new(
        depot.lat + rng.gen_range(-START_JITTER_DEG..=START_JITTER_DEG),
        depot.lon + rng.gen_range(-START_JITTER_DEG..=START_JITTER_DEG),
    )
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "()")]
struct StartRoute {
    order_id: Uuid,
    customer_id: Uuid,
    agent_id: Uuid,
    correlation_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
struct EndRoute {
    order_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
struct RouteFinished {
    order_id: Uuid,
}

// ============================================================================
// Consumer bridge
// ============================================================================

struct CourierSimHandler {
    actor: Addr<CourierSimActor>,
}

#[async_trait]
impl EventHandler for CourierSimHandler {
    async fn handle(&mut self, envelope: BusEnvelope) -> Result<()> {
        match &envelope.event_data {
            DeliveryEvent::OrderPickedUp(e) => {
                self.actor.do_send(StartRoute {
                    order_id: e.order_id,
                    customer_id: e.customer_id,
                    agent_id: e.agent_id,
                    correlation_id: envelope.correlation_id,
                });
            }
            DeliveryEvent::OrderDelivered(e) => {
                self.actor.do_send(EndRoute {
                    order_id: e.order_id,
                });
            }
            _ => {}
        }

        Ok(())
    }
}

// ============================================================================
// Actor
// ============================================================================

pub struct CourierSimActor {
    brokers: String,
    publisher: Arc<EventPublisher>,
    agents: AgentStore,
    config: SimConfig,
    health: Addr<HealthMonitorActor>,
    consumer: Option<tokio::task::JoinHandle<()>>,
    routes: HashMap<Uuid, tokio::task::JoinHandle<()>>,
}

impl CourierSimActor {
    pub fn new(
        brokers: String,
        publisher: Arc<EventPublisher>,
        agents: AgentStore,
        config: SimConfig,
        health: Addr<HealthMonitorActor>,
    ) -> Self {
        Self {
            brokers,
            publisher,
            agents,
            config,
            health,
            consumer: None,
            routes: HashMap::new(),
        }
    }
}

impl Actor for CourierSimActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let handler = CourierSimHandler {
            actor: ctx.address(),
        };

        let consumer_topics = &[topics::ORDER_PICKEDUP, topics::ORDER_DELIVERED];
        match spawn_consumer(&self.brokers, CONSUMER_GROUP, consumer_topics, handler) {
            Ok(handle) => {
                self.consumer = Some(handle);
                self.health.do_send(UpdateHealth {
                    component: CONSUMER_GROUP.to_string(),
                    status: HealthStatus::Healthy,
                });
                tracing::info!("CourierSimActor started");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to start courier sim consumer");
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
        for (_, route) in self.routes.drain() {
            route.abort();
        }
        tracing::info!("CourierSimActor stopped");
    }
}

impl Handler<StartRoute> for CourierSimActor {
    type Result = ();

    fn handle(&mut self, msg: StartRoute, ctx: &mut Self::Context) {
        if self.routes.contains_key(&msg.order_id) {
            // Redelivered pickup event; the route is already running.
            return;
        }

        tracing::info!(
            order_id = %msg.order_id,
            agent_id = %msg.agent_id,
            "Starting simulated courier route"
        );

        let publisher = self.publisher.clone();
        let agents = self.agents.clone();
        let config = self.config.clone();
        let actor = ctx.address();
        let order_id = msg.order_id;

        let handle = tokio::spawn(async move {
            drive_route(publisher, agents, config, &msg).await;
            actor.do_send(RouteFinished {
                order_id: msg.order_id,
            });
        });

        self.routes.insert(order_id, handle);
    }
}

impl Handler<EndRoute> for CourierSimActor {
    type Result = ();

    fn handle(&mut self, msg: EndRoute, _: &mut Self::Context) {
        if let Some(route) = self.routes.remove(&msg.order_id) {
            route.abort();
            tracing::info!(order_id = %msg.order_id, "Route ended by delivery");
        }
    }
}

impl Handler<RouteFinished> for CourierSimActor {
    type Result = ();

    fn handle(&mut self, msg: RouteFinished, _: &mut Self::Context) {
        if self.routes.remove(&msg.order_id).is_some() {
            tracing::info!(order_id = %msg.order_id, "Route reached the drop point");
        }
    }
}

// ============================================================================
// Route loop
// ============================================================================

async fn drive_route(
    publisher: Arc<EventPublisher>,
    agents: AgentStore,
    config: SimConfig,
    route: &StartRoute,
) {
    let destination = drop_point(config.depot, route.order_id);
    let mut position = jittered_start(config.depot);
    let mut arrival_sent = false;

    loop {
        tokio::time::sleep(config.tick).await;
        position = position.step_toward(&destination, config.speed_m_per_tick);

        let ping = DeliveryEvent::LocationUpdate(LocationUpdate {
            order_id: route.order_id,
            customer_id: route.customer_id,
            agent_id: route.agent_id,
            location: position,
            recorded_at: Utc::now(),
        });
        if let Err(e) = publisher
            .publish(&BusEnvelope::wrap(ping, route.correlation_id))
            .await
        {
            tracing::error!(
                order_id = %route.order_id,
                error = %e,
                "Failed to publish location update"
            );
        }

        if let Err(e) = agents.update_location(route.agent_id, position).await {
            tracing::error!(
                agent_id = %route.agent_id,
                error = %e,
                "Failed to store courier location"
            );
        }

        let remaining = position.distance_m(&destination);
        if !arrival_sent && remaining <= config.arrival_radius_m {
            arrival_sent = true;

            let arriving = DeliveryEvent::DriverArriving(DriverArriving {
                order_id: route.order_id,
                customer_id: route.customer_id,
                agent_id: route.agent_id,
                distance_m: remaining,
                recorded_at: Utc::now(),
            });
            if let Err(e) = publisher
                .publish(&BusEnvelope::wrap(arriving, route.correlation_id))
                .await
            {
                tracing::error!(
                    order_id = %route.order_id,
                    error = %e,
                    "Failed to publish driver-arriving"
                );
            }
        }

        if remaining == 0.0 {
            break;
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_point_is_deterministic() {
        let depot = GeoPoint::new(45.7640, 4.8357);
        let order_id = Uuid::new_v4();

        assert_eq!(drop_point(depot, order_id), drop_point(depot, order_id));
    }

    #[test]
    fn test_drop_point_stays_in_spread() {
        let depot = GeoPoint::new(45.7640, 4.8357);

        for _ in 0..100 {
            let point = drop_point(depot, Uuid::new_v4());
            assert!((point.lat - depot.lat).abs() <= DROP_SPREAD_DEG);
            assert!((point.lon - depot.lon).abs() <= DROP_SPREAD_DEG);
        }
    }

    #[test]
    fn test_start_jitter_stays_near_depot() {
        let depot = GeoPoint::new(45.7640, 4.8357);

        for _ in 0..100 {
            let start = jittered_start(depot);
            assert!((start.lat - depot.lat).abs() <= START_JITTER_DEG);
            assert!((start.lon - depot.lon).abs() <= START_JITTER_DEG);
        }
    }

    #[test]
    fn test_route_converges_within_tick_budget() {
        let config = SimConfig::default();
        let depot = config.depot;
        let destination = drop_point(depot, Uuid::new_v4());
        let mut position = depot;

        // Worst case: the far corner of the spread square plus start jitter,
        // covered at speed_m_per_tick per tick.
        let mut ticks = 0;
        while position != destination {
            position = position.step_toward(&destination, config.speed_m_per_tick);
            ticks += 1;
            assert!(ticks < 100, "route did not converge");
        }
    }
}
