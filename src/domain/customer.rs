use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Customer Model
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller provides when registering or updating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl Customer {
    pub fn register(profile: CustomerProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: profile.name,
            email: profile.email,
            phone: profile.phone,
            created_at: Utc::now(),
        }
    }
}
