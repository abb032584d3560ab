use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::order::model::{DeliveryAddress, Order, OrderItem, OrderStatus};

// ============================================================================
// Order Store
// ============================================================================

#[derive(Clone)]
pub struct OrderStore {
    pool: PgPool,
}

impl OrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, order: &Order) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO orders (
                id, customer_id, partner_id, agent_id,
                street, city, postal_code, items,
                subtotal_cents, delivery_fee_cents, total_cents,
                status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(order.partner_id)
        .bind(order.agent_id)
        .bind(&order.address.street)
        .bind(&order.address.city)
        .bind(&order.address.postal_code)
        .bind(sqlx::types::Json(&order.items))
        .bind(order.subtotal_cents)
        .bind(order.delivery_fee_cents)
        .bind(order.total_cents)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_order(&r)).transpose()
    }

    /// List orders, optionally narrowed to one customer and/or one partner.
    pub async fn list(
        &self,
        customer_id: Option<Uuid>,
        partner_id: Option<Uuid>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM orders
             WHERE ($1::uuid IS NULL OR customer_id = $1)
               AND ($2::uuid IS NULL OR partner_id = $2)
             ORDER BY created_at DESC
             LIMIT 200",
        )
        .bind(customer_id)
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_order).collect()
    }

    /// Persist a lifecycle transition: status, courier assignment, and the
    /// update timestamp. All other columns are immutable after insert.
    pub async fn update_transition(&self, order: &Order) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE orders SET status = $2, agent_id = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(order.agent_id)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn row_to_order(row: &sqlx::postgres::PgRow) -> Result<Order, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status
        .parse()
        .map_err(|e: String| sqlx::Error::Decode(e.into()))?;
    let items: sqlx::types::Json<Vec<OrderItem>> = row.try_get("items")?;

    Ok(Order {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        partner_id: row.try_get("partner_id")?,
        agent_id: row.try_get("agent_id")?,
        address: DeliveryAddress {
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            postal_code: row.try_get("postal_code")?,
        },
        items: items.0,
        subtotal_cents: row.try_get("subtotal_cents")?,
        delivery_fee_cents: row.try_get("delivery_fee_cents")?,
        total_cents: row.try_get("total_cents")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
