use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::food::generate_id;

/// A single user rating of a food item. Ratings are never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub item_id: String,
    pub user_id: String,
    pub score: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request model for rating a food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRatingRequest {
    pub item_id: String,
    pub score: u8,
    pub comment: Option<String>,
}

/// Response model for a rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResponse {
    pub id: String,
    pub item_id: String,
    pub user_id: String,
    pub score: u8,
    pub comment: Option<String>,
}

impl Rating {
    pub fn new(user_id: String, request: CreateRatingRequest) -> Self {
        Self {
            id: generate_id("R"),
            item_id: request.item_id,
            user_id,
            score: request.score,
            comment: request.comment,
            created_at: Utc::now(),
        }
    }

    pub fn to_response(&self) -> RatingResponse {
        RatingResponse {
            id: self.id.clone(),
            item_id: self.item_id.clone(),
            user_id: self.user_id.clone(),
            score: self.score,
            comment: self.comment.clone(),
        }
    }
}

/// One aggregation step: returns the new `(avg_rating, rating_count)`.
///
/// `avg_rating` is rebuilt from the previous, already rounded average, then
/// rounded to 2 dp again, ties going to the even neighbour.
pub fn running_average(avg_rating: Decimal, rating_count: u32, score: u8) -> (Decimal, u32) {
    let total = avg_rating * Decimal::from(rating_count) + Decimal::from(score);
    let rating_count = rating_count.saturating_add(1);
    let avg_rating = (total / Decimal::from(rating_count))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    (avg_rating, rating_count)
}
