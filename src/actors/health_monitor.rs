use actix::prelude::*;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::messaging::EventPublisher;
use crate::utils::CircuitState;

// ============================================================================
// Health Monitor Actor
// ============================================================================
//
// Tracks per-component health reported by the other actors and periodically
// probes the Kafka producer's circuit breaker. The HTTP health endpoint
// queries this actor for the aggregate view.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded(_) => "degraded",
            HealthStatus::Unhealthy(_) => "unhealthy",
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            HealthStatus::Healthy => None,
            HealthStatus::Degraded(msg) | HealthStatus::Unhealthy(msg) => Some(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub last_check: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub overall_status: HealthStatus,
    pub components: HashMap<String, ComponentHealth>,
    pub check_time: DateTime<Utc>,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Message)]
#[rtype(result = "()")]
pub struct UpdateHealth {
    pub component: String,
    pub status: HealthStatus,
}

#[derive(Message)]
#[rtype(result = "SystemHealth")]
pub struct GetSystemHealth;

// ============================================================================
// Actor
// ============================================================================

pub struct HealthMonitorActor {
    components: HashMap<String, ComponentHealth>,
    publisher: Arc<EventPublisher>,
}

impl HealthMonitorActor {
    pub fn new(publisher: Arc<EventPublisher>) -> Self {
        Self {
            components: HashMap::new(),
            publisher,
        }
    }

    fn overall(&self) -> HealthStatus {
        let mut degraded = false;
        let mut unhealthy = Vec::new();

        for (name, health) in &self.components {
            match &health.status {
                HealthStatus::Unhealthy(msg) => unhealthy.push(format!("{name}: {msg}")),
                HealthStatus::Degraded(_) => degraded = true,
                HealthStatus::Healthy => {}
            }
        }

        if !unhealthy.is_empty() {
            HealthStatus::Unhealthy(unhealthy.join(", "))
        } else if degraded {
            HealthStatus::Degraded("Some components degraded".to_string())
        } else {
            HealthStatus::Healthy
        }
    }
}

impl Actor for HealthMonitorActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!("HealthMonitorActor started");

        let addr = ctx.address();

        // Probe the producer's circuit breaker on an interval; everything
        // else self-reports through UpdateHealth.
        ctx.run_interval(std::time::Duration::from_secs(10), move |act, _ctx| {
            let publisher = act.publisher.clone();
            let addr = addr.clone();

            actix::spawn(async move {
                let status = match publisher.circuit_state().await {
                    CircuitState::Closed => HealthStatus::Healthy,
                    CircuitState::HalfOpen => {
                        HealthStatus::Degraded("Circuit breaker half-open".to_string())
                    }
                    CircuitState::Open => {
                        HealthStatus::Unhealthy("Circuit breaker open".to_string())
                    }
                };

                addr.do_send(UpdateHealth {
                    component: "kafka_producer".to_string(),
                    status,
                });
            });
        });
    }
}

impl Handler<UpdateHealth> for HealthMonitorActor {
    type Result = ();

    fn handle(&mut self, msg: UpdateHealth, _: &mut Self::Context) {
        tracing::debug!(
            component = %msg.component,
            status = ?msg.status,
            "Updated component health"
        );

        self.components.insert(
            msg.component.clone(),
            ComponentHealth {
                name: msg.component,
                status: msg.status,
                last_check: Utc::now(),
            },
        );
    }
}

impl Handler<GetSystemHealth> for HealthMonitorActor {
    type Result = MessageResult<GetSystemHealth>;

    fn handle(&mut self, _: GetSystemHealth, _: &mut Self::Context) -> Self::Result {
        MessageResult(SystemHealth {
            overall_status: self.overall(),
            components: self.components.clone(),
            check_time: Utc::now(),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_prefers_unhealthy() {
        let publisher = Arc::new(EventPublisher::new("localhost:9092").unwrap());
        let mut monitor = HealthMonitorActor::new(publisher);

        monitor.components.insert(
            "a".to_string(),
            ComponentHealth {
                name: "a".to_string(),
                status: HealthStatus::Degraded("slow".to_string()),
                last_check: Utc::now(),
            },
        );
        monitor.components.insert(
            "b".to_string(),
            ComponentHealth {
                name: "b".to_string(),
                status: HealthStatus::Unhealthy("down".to_string()),
                last_check: Utc::now(),
            },
        );

        assert!(matches!(monitor.overall(), HealthStatus::Unhealthy(_)));
    }

    #[test]
    fn test_overall_healthy_when_empty() {
        let publisher = Arc::new(EventPublisher::new("localhost:9092").unwrap());
        let monitor = HealthMonitorActor::new(publisher);
        assert!(monitor.overall().is_healthy());
    }
}
