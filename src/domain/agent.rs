use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::GeoPoint;

// ============================================================================
// Agent Model - Delivery Couriers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub available: bool,
    pub last_location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub phone: Option<String>,
}

impl Agent {
    pub fn register(profile: AgentProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: profile.name,
            phone: profile.phone,
            available: true,
            last_location: None,
            created_at: Utc::now(),
        }
    }
}
