use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::feedback::FeedbackError;
use crate::domain::order::errors::OrderError;

// ============================================================================
// API Error - HTTP status mapping
// ============================================================================
//
// Every handler error funnels into this enum. The mapping is uniform across
// resources: bad input 400, unknown id 404, business rule conflict 409,
// everything else 500.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::EmptyItems
            | OrderError::InvalidQuantity(_)
            | OrderError::InvalidPrice(_)
            | OrderError::InvalidDeliveryFee(_)
            | OrderError::BlankAddress => ApiError::Validation(e.to_string()),

            OrderError::AlreadyDecided(_)
            | OrderError::NotAccepted(_)
            | OrderError::NotReady(_)
            | OrderError::NotPickedUp(_) => ApiError::Conflict(e.to_string()),
        }
    }
}

impl From<FeedbackError> for ApiError {
    fn from(e: FeedbackError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::model::OrderStatus;

    #[test]
    fn test_validation_maps_to_400() {
        let err: ApiError = OrderError::EmptyItems.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_transition_maps_to_409() {
        let err: ApiError = OrderError::AlreadyDecided(OrderStatus::Accepted).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            ApiError::NotFound("Order").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_feedback_error_maps_to_400() {
        let err: ApiError = FeedbackError::InvalidRating(9).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let err = ApiError::Internal(anyhow::anyhow!("broker is down"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
