use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::customer::{Customer, CustomerProfile};

// ============================================================================
// Customer Store
// ============================================================================

#[derive(Clone)]
pub struct CustomerStore {
    pool: PgPool,
}

impl CustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, customer: &Customer) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO customers (id, name, email, phone, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_customer(&r)).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Customer>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM customers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_customer).collect()
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        profile: &CustomerProfile,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE customers SET name = $2, email = $3, phone = $4 WHERE id = $1")
                .bind(id)
                .bind(&profile.name)
                .bind(&profile.email)
                .bind(&profile.phone)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_customer(row: &sqlx::postgres::PgRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
    })
}
