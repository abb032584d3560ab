// ============================================================================
// Actors Module
// ============================================================================
//
// Actor-based infrastructure: the coordinator supervises one actor per
// consumer subsystem (partner relay, notifier, courier simulator, gateway
// push) plus the health monitor. Domain logic lives in domain/, not here;
// actors only wire consumption, side effects, and lifecycle.
//
// ============================================================================

mod coordinator;
mod courier_sim;
mod health_monitor;
mod notifier;
mod partner_relay;

pub use coordinator::{CoordinatorActor, Shutdown};
pub use courier_sim::{CourierSimActor, SimConfig};
pub use health_monitor::{
    ComponentHealth, GetSystemHealth, HealthMonitorActor, HealthStatus, SystemHealth, UpdateHealth,
};
pub use notifier::NotifierActor;
pub use partner_relay::PartnerRelayActor;
