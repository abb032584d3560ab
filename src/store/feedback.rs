use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::feedback::Feedback;

// ============================================================================
// Feedback Store
// ============================================================================

#[derive(Clone)]
pub struct FeedbackStore {
    pool: PgPool,
}

impl FeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, feedback: &Feedback) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO feedback (id, order_id, customer_id, partner_id, rating, comment, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(feedback.id)
        .bind(feedback.order_id)
        .bind(feedback.customer_id)
        .bind(feedback.partner_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch_for_order(&self, order_id: Uuid) -> Result<Option<Feedback>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM feedback WHERE order_id = $1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_feedback(&r)).transpose()
    }

    pub async fn list_for_partner(&self, partner_id: Uuid) -> Result<Vec<Feedback>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT * FROM feedback WHERE partner_id = $1 ORDER BY created_at DESC LIMIT 200",
        )
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_feedback).collect()
    }
}

fn row_to_feedback(row: &sqlx::postgres::PgRow) -> Result<Feedback, sqlx::Error> {
    Ok(Feedback {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        customer_id: row.try_get("customer_id")?,
        partner_id: row.try_get("partner_id")?,
        rating: row.try_get("rating")?,
        comment: row.try_get("comment")?,
        created_at: row.try_get("created_at")?,
    })
}
