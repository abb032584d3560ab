use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::domain::geo::GeoPoint;

// ============================================================================
// Agent Store
// ============================================================================

#[derive(Clone)]
pub struct AgentStore {
    pool: PgPool,
}

impl AgentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, agent: &Agent) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO agents (id, name, phone, available, last_lat, last_lon, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(agent.id)
        .bind(&agent.name)
        .bind(&agent.phone)
        .bind(agent.available)
        .bind(agent.last_location.map(|p| p.lat))
        .bind(agent.last_location.map(|p| p.lon))
        .bind(agent.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Option<Agent>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_agent(&r)).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Agent>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM agents ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_agent).collect()
    }

    pub async fn set_available(&self, id: Uuid, available: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE agents SET available = $2 WHERE id = $1")
            .bind(id)
            .bind(available)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Written by the courier simulator as location pings are published.
    pub async fn update_location(&self, id: Uuid, location: GeoPoint) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE agents SET last_lat = $2, last_lon = $3 WHERE id = $1")
            .bind(id)
            .bind(location.lat)
            .bind(location.lon)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn row_to_agent(row: &sqlx::postgres::PgRow) -> Result<Agent, sqlx::Error> {
    let last_lat: Option<f64> = row.try_get("last_lat")?;
    let last_lon: Option<f64> = row.try_get("last_lon")?;

    Ok(Agent {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        phone: row.try_get("phone")?,
        available: row.try_get("available")?,
        last_location: match (last_lat, last_lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        },
        created_at: row.try_get("created_at")?,
    })
}
