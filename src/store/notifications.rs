use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::notification::{Notification, Role};

// ============================================================================
// Notification Store
// ============================================================================

#[derive(Clone)]
pub struct NotificationStore {
    pool: PgPool,
}

impl NotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, notification: &Notification) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, recipient_role, order_id, message, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(notification.id)
        .bind(notification.recipient_id)
        .bind(notification.recipient_role.as_str())
        .bind(notification.order_id)
        .bind(&notification.message)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        role: Role,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM notifications
             WHERE recipient_id = $1 AND recipient_role = $2
             ORDER BY created_at DESC
             LIMIT $3",
        )
        .bind(recipient_id)
        .bind(role.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_notification).collect()
    }
}

fn row_to_notification(row: &sqlx::postgres::PgRow) -> Result<Notification, sqlx::Error> {
    let role: String = row.try_get("recipient_role")?;
    let role: Role = role
        .parse()
        .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

    Ok(Notification {
        id: row.try_get("id")?,
        recipient_id: row.try_get("recipient_id")?,
        recipient_role: role,
        order_id: row.try_get("order_id")?,
        message: row.try_get("message")?,
        created_at: row.try_get("created_at")?,
    })
}
