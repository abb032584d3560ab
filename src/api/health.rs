use actix_web::{web, HttpResponse};

use crate::actors::GetSystemHealth;
use crate::error::ApiError;

use super::state::AppState;

// ============================================================================
// Health Endpoint
// ============================================================================

pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let snapshot = state
        .health
        .send(GetSystemHealth)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Health monitor unavailable: {e}")))?;

    let components: serde_json::Map<String, serde_json::Value> = snapshot
        .components
        .values()
        .map(|c| {
            (
                c.name.clone(),
                serde_json::json!({
                    "status": c.status.label(),
                    "detail": c.status.detail(),
                    "last_check": c.last_check,
                }),
            )
        })
        .collect();

    let body = serde_json::json!({
        "status": snapshot.overall_status.label(),
        "detail": snapshot.overall_status.detail(),
        "checked_at": snapshot.check_time,
        "components": components,
    });

    if snapshot.overall_status.is_healthy() {
        Ok(HttpResponse::Ok().json(body))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(body))
    }
}
