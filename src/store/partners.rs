use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::geo::GeoPoint;
use crate::domain::order::model::{OrderItem, OrderStatus};
use crate::domain::partner::{Partner, PartnerOrder};

// ============================================================================
// Partner Store
// ============================================================================

#[derive(Clone)]
pub struct PartnerStore {
    pool: PgPool,
}

impl PartnerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, partner: &Partner) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO partners (id, name, street, city, lat, lon, is_open, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(partner.id)
        .bind(&partner.name)
        .bind(&partner.street)
        .bind(&partner.city)
        .bind(partner.location.lat)
        .bind(partner.location.lon)
        .bind(partner.is_open)
        .bind(partner.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Option<Partner>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_partner(&r)).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Partner>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM partners ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_partner).collect()
    }

    pub async fn set_open(&self, id: Uuid, is_open: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE partners SET is_open = $2 WHERE id = $1")
            .bind(id)
            .bind(is_open)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_partner(row: &sqlx::postgres::PgRow) -> Result<Partner, sqlx::Error> {
    Ok(Partner {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        street: row.try_get("street")?,
        city: row.try_get("city")?,
        location: GeoPoint::new(row.try_get("lat")?, row.try_get("lon")?),
        is_open: row.try_get("is_open")?,
        created_at: row.try_get("created_at")?,
    })
}

// ============================================================================
// Partner Order Store - the relay's denormalized copy
// ============================================================================

#[derive(Clone)]
pub struct PartnerOrderStore {
    pool: PgPool,
}

impl PartnerOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the copy for a newly placed order. Redelivered placement events
    /// overwrite the row wholesale, which is idempotent in effect even though
    /// the relay does not deduplicate.
    pub async fn upsert_placed(&self, record: &PartnerOrder) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO partner_orders (
                order_id, partner_id, customer_id, items, total_cents,
                status, placed_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (order_id) DO UPDATE SET
                items = EXCLUDED.items,
                total_cents = EXCLUDED.total_cents,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at",
        )
        .bind(record.order_id)
        .bind(record.partner_id)
        .bind(record.customer_id)
        .bind(sqlx::types::Json(&record.items))
        .bind(record.total_cents)
        .bind(record.status.as_str())
        .bind(record.placed_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE partner_orders SET status = $2, updated_at = $3 WHERE order_id = $1",
        )
        .bind(order_id)
        .bind(status.as_str())
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_partner(
        &self,
        partner_id: Uuid,
    ) -> Result<Vec<PartnerOrder>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM partner_orders WHERE partner_id = $1 ORDER BY placed_at DESC LIMIT 200",
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_partner_order).collect()
    }
}

fn row_to_partner_order(row: &sqlx::postgres::PgRow) -> Result<PartnerOrder, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status
        .parse()
        .map_err(|e: String| sqlx::Error::Decode(e.into()))?;
    let items: sqlx::types::Json<Vec<OrderItem>> = row.try_get("items")?;

    Ok(PartnerOrder {
        order_id: row.try_get("order_id")?,
        partner_id: row.try_get("partner_id")?,
        customer_id: row.try_get("customer_id")?,
        items: items.0,
        total_cents: row.try_get("total_cents")?,
        status,
        placed_at: row.try_get("placed_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
