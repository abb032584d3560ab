use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::notification::Role;
use crate::error::ApiError;

use super::state::AppState;

// ============================================================================
// Notification Endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    pub recipient_id: Uuid,
    pub role: String,
    pub limit: Option<i64>,
}

pub async fn list_notifications(
    state: web::Data<AppState>,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse, ApiError> {
    let role: Role = query
        .role
        .parse()
        .map_err(|e: String| ApiError::Validation(e))?;
    let limit = query.limit.unwrap_or(50).clamp(1, 200);

    let rows = state
        .notifications
        .list_for_recipient(query.recipient_id, role, limit)
        .await?;

    Ok(HttpResponse::Ok().json(rows))
}
