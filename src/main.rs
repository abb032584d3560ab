use actix::prelude::*;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actors;
mod api;
mod config;
mod domain;
mod error;
mod gateway;
mod messaging;
mod store;
mod utils;

use actors::{CoordinatorActor, HealthMonitorActor, Shutdown};
use api::AppState;
use config::Config;
use gateway::ConnectionRegistry;
use messaging::EventPublisher;
use store::{
    AgentStore, CustomerStore, FeedbackStore, NotificationStore, OrderStore, PartnerOrderStore,
    PartnerStore,
};

#[actix::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging with environment-based filtering.
    // Override with RUST_LOG, e.g. RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mealdrop=debug")),
        )
        .init();

    tracing::info!("🚀 Starting mealdrop delivery platform");

    let config = Config::from_env();
    tracing::info!(
        brokers = %config.kafka_brokers,
        http_addr = %config.http_addr,
        "Configuration loaded"
    );

    // === 1. Postgres (with startup backoff) + migrations ===
    let pool = store::connect(&config.database_url).await?;

    let orders = OrderStore::new(pool.clone());
    let partners = PartnerStore::new(pool.clone());
    let partner_orders = PartnerOrderStore::new(pool.clone());
    let agents = AgentStore::new(pool.clone());
    let customers = CustomerStore::new(pool.clone());
    let feedback = FeedbackStore::new(pool.clone());
    let notifications = NotificationStore::new(pool.clone());

    // === 2. Kafka producer (behind a circuit breaker) ===
    let publisher = Arc::new(EventPublisher::new(&config.kafka_brokers)?);

    // === 3. Shared actors: websocket registry + health monitor ===
    let registry = ConnectionRegistry::new().start();
    let health = HealthMonitorActor::new(publisher.clone()).start();

    // === 4. Coordinator: relays, notifier, courier sim, gateway push ===
    let coordinator = CoordinatorActor::new(
        config.kafka_brokers.clone(),
        publisher.clone(),
        partner_orders.clone(),
        notifications.clone(),
        agents.clone(),
        config.sim.clone(),
        registry.clone(),
        health.clone(),
    )
    .start();

    // === 5. HTTP API + websocket gateways ===
    let state = AppState {
        orders,
        partners,
        partner_orders,
        agents,
        customers,
        feedback,
        notifications,
        publisher,
        registry,
        health,
    };

    tracing::info!(addr = %config.http_addr, "📡 HTTP server listening");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure)
    })
    .bind(&config.http_addr)?
    .run()
    .await?;

    // The server has been asked to stop; shut the consumers down too.
    tracing::info!("🛑 HTTP server stopped, shutting down subsystems");
    coordinator.send(Shutdown).await.ok();

    Ok(())
}
