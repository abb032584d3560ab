use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentProfile};
use crate::error::ApiError;

use super::state::AppState;

// ============================================================================
// Agent Endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetAvailableRequest {
    pub available: bool,
}

pub async fn create_agent(
    state: web::Data<AppState>,
    body: web::Json<AgentProfile>,
) -> Result<HttpResponse, ApiError> {
    let profile = body.into_inner();
    if profile.name.trim().is_empty() {
        return Err(ApiError::Validation("Agent name cannot be blank".to_string()));
    }

    let agent = Agent::register(profile);
    state.agents.insert(&agent).await?;

    tracing::info!(agent_id = %agent.id, name = %agent.name, "Agent registered");
    Ok(HttpResponse::Created().json(agent))
}

pub async fn get_agent(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let agent = state
        .agents
        .fetch(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Agent"))?;

    Ok(HttpResponse::Ok().json(agent))
}

pub async fn list_agents(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.agents.list().await?))
}

pub async fn set_available(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SetAvailableRequest>,
) -> Result<HttpResponse, ApiError> {
    let updated = state
        .agents
        .set_available(path.into_inner(), body.available)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Agent"));
    }

    Ok(HttpResponse::NoContent().finish())
}
