use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::feedback::Feedback;
use crate::domain::order::model::OrderStatus;
use crate::error::ApiError;

use super::state::AppState;

// ============================================================================
// Feedback Endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    pub rating: i16,
    pub comment: Option<String>,
}

pub async fn create_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, ApiError> {
    let order_id = path.into_inner();
    let order = state
        .orders
        .fetch(order_id)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;

    if order.status != OrderStatus::Delivered {
        return Err(ApiError::Conflict(
            "Feedback is only accepted for delivered orders".to_string(),
        ));
    }
    if state.feedback.fetch_for_order(order_id).await?.is_some() {
        return Err(ApiError::Conflict(
            "Feedback already submitted for this order".to_string(),
        ));
    }

    let feedback = Feedback::new(
        order_id,
        order.customer_id,
        order.partner_id,
        body.rating,
        body.comment.clone(),
    )?;
    state.feedback.insert(&feedback).await?;

    tracing::info!(
        order_id = %order_id,
        rating = feedback.rating,
        "Feedback recorded"
    );

    Ok(HttpResponse::Created().json(feedback))
}

pub async fn get_order_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let feedback = state
        .feedback
        .fetch_for_order(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Feedback"))?;

    Ok(HttpResponse::Ok().json(feedback))
}
