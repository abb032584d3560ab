use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use uuid::Uuid;

use crate::domain::notification::Role;
use crate::error::ApiError;
use crate::gateway::WsSession;

use super::state::AppState;

// ============================================================================
// Websocket Upgrade Endpoints
// ============================================================================
//
// One route per role: /ws/customer/{id}, /ws/partner/{id}, /ws/agent/{id}.
// Connecting registers the session under (role, id); a newer connection for
// the same key replaces and closes this one.
//
// ============================================================================

pub async fn connect(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (role_raw, user_id) = path.into_inner();
    let role: Role = role_raw
        .parse()
        .map_err(|e: String| ApiError::Validation(e))?;

    let session = WsSession::new(role, user_id, state.registry.clone());

    ws::start(session, &req, stream).map_err(|e| {
        tracing::error!(error = %e, "Websocket upgrade failed");
        ApiError::Validation("Websocket upgrade failed".to_string())
    })
}
