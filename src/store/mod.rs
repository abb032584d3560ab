use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::utils::{retry_with_backoff, RetryConfig, RetryResult};

// ============================================================================
// Store Module - Postgres Persistence
// ============================================================================
//
// One store type per table, each a thin CRUD layer over a shared PgPool.
// Order rows are mutated only by the API handlers; partner_orders and
// notifications are written only by their relay consumers.
//
// ============================================================================

pub mod agents;
pub mod customers;
pub mod feedback;
pub mod notifications;
pub mod orders;
pub mod partners;

pub use agents::AgentStore;
pub use customers::CustomerStore;
pub use feedback::FeedbackStore;
pub use notifications::NotificationStore;
pub use orders::OrderStore;
pub use partners::{PartnerOrderStore, PartnerStore};

/// Connect to Postgres with startup backoff and apply migrations.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let url = database_url.to_string();

    let pool = match retry_with_backoff(RetryConfig::startup(), |attempt| {
        let url = url.clone();
        async move {
            tracing::debug!(attempt = attempt, "Connecting to Postgres");
            PgPoolOptions::new()
                .max_connections(10)
                .connect(&url)
                .await
        }
    })
    .await
    {
        RetryResult::Success(pool) => pool,
        RetryResult::Failed(e) => {
            return Err(anyhow::anyhow!("Could not connect to Postgres: {e}"));
        }
    };

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Postgres connected, migrations applied");

    Ok(pool)
}
