use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Feedback Model - Order Ratings
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i16),

    #[error("Comment exceeds {MAX_COMMENT_LEN} characters")]
    CommentTooLong,
}

const MAX_COMMENT_LEN: usize = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub partner_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(
        order_id: Uuid,
        customer_id: Uuid,
        partner_id: Uuid,
        rating: i16,
        comment: Option<String>,
    ) -> Result<Self, FeedbackError> {
        if !(1..=5).contains(&rating) {
            return Err(FeedbackError::InvalidRating(rating));
        }
        if let Some(ref text) = comment {
            if text.chars().count() > MAX_COMMENT_LEN {
                return Err(FeedbackError::CommentTooLong);
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            order_id,
            customer_id,
            partner_id,
            rating,
            comment,
            created_at: Utc::now(),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let id = Uuid::new_v4();
        assert!(Feedback::new(id, id, id, 1, None).is_ok());
        assert!(Feedback::new(id, id, id, 5, None).is_ok());
        assert!(matches!(
            Feedback::new(id, id, id, 0, None),
            Err(FeedbackError::InvalidRating(0))
        ));
        assert!(matches!(
            Feedback::new(id, id, id, 6, None),
            Err(FeedbackError::InvalidRating(6))
        ));
    }

    #[test]
    fn test_comment_length_limit() {
        let id = Uuid::new_v4();
        let long = "x".repeat(MAX_COMMENT_LEN + 1);
        assert!(matches!(
            Feedback::new(id, id, id, 4, Some(long)),
            Err(FeedbackError::CommentTooLong)
        ));
    }
}
