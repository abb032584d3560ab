use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::partner::{Partner, PartnerProfile};
use crate::error::ApiError;

use super::state::AppState;

// ============================================================================
// Partner Endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetOpenRequest {
    pub is_open: bool,
}

pub async fn create_partner(
    state: web::Data<AppState>,
    body: web::Json<PartnerProfile>,
) -> Result<HttpResponse, ApiError> {
    let profile = body.into_inner();
    if profile.name.trim().is_empty() {
        return Err(ApiError::Validation("Partner name cannot be blank".to_string()));
    }

    let partner = Partner::register(profile);
    state.partners.insert(&partner).await?;

    tracing::info!(partner_id = %partner.id, name = %partner.name, "Partner registered");
    Ok(HttpResponse::Created().json(partner))
}

pub async fn get_partner(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let partner = state
        .partners
        .fetch(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Partner"))?;

    Ok(HttpResponse::Ok().json(partner))
}

pub async fn list_partners(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.partners.list().await?))
}

pub async fn set_open(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SetOpenRequest>,
) -> Result<HttpResponse, ApiError> {
    let updated = state.partners.set_open(path.into_inner(), body.is_open).await?;
    if !updated {
        return Err(ApiError::NotFound("Partner"));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// The partner's own view of its orders, served from the denormalized copy
/// the relay maintains, not from the orders table.
pub async fn list_partner_orders(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let partner_id = path.into_inner();
    if state.partners.fetch(partner_id).await?.is_none() {
        return Err(ApiError::NotFound("Partner"));
    }

    Ok(HttpResponse::Ok().json(state.partner_orders.list_for_partner(partner_id).await?))
}

pub async fn list_partner_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let partner_id = path.into_inner();
    if state.partners.fetch(partner_id).await?.is_none() {
        return Err(ApiError::NotFound("Partner"));
    }

    Ok(HttpResponse::Ok().json(state.feedback.list_for_partner(partner_id).await?))
}
