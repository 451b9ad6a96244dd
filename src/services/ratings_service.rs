use std::sync::Arc;
use tracing::instrument;

use crate::models::{CreateRatingRequest, Rating, ServiceError, ServiceResult, Validate};
use crate::observability::{Metrics, StoreTracingMiddleware};
use crate::repositories::{FoodItemRepository, RatingRepository};

const TABLE: &str = "ratings";

/// Rating submission and lookup
pub struct RatingsService {
    ratings: Arc<dyn RatingRepository>,
    items: Arc<dyn FoodItemRepository>,
    store_tracing: StoreTracingMiddleware,
}

impl RatingsService {
    pub fn new(ratings: Arc<dyn RatingRepository>, items: Arc<dyn FoodItemRepository>) -> Self {
        Self {
            ratings,
            items,
            store_tracing: StoreTracingMiddleware::default(),
        }
    }

    pub fn new_with_metrics(
        ratings: Arc<dyn RatingRepository>,
        items: Arc<dyn FoodItemRepository>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            ratings,
            items,
            store_tracing: StoreTracingMiddleware::new(Some(metrics)),
        }
    }

    /// Store a rating by `user_id`. The item must exist when the rating is
    /// submitted; the store folds the score into the item's running average.
    #[instrument(skip(self, request), fields(item_id = %request.item_id, score = request.score, user_id = %user_id))]
    pub async fn add_rating(
        &self,
        user_id: &str,
        request: CreateRatingRequest,
    ) -> ServiceResult<Rating> {
        crate::info_with_trace!("Submitting rating");

        request.validate()?;

        let exists = self
            .store_tracing
            .trace_operation("find_by_id", "items", self.items.find_by_id(&request.item_id))
            .await?
            .is_some();
        if !exists {
            crate::warn_with_trace!("Rated item not found");
            return Err(ServiceError::ItemNotFound {
                id: request.item_id,
            });
        }

        let rating = Rating::new(user_id.to_string(), request);
        let score = rating.score;
        let stored = self
            .store_tracing
            .trace_operation("add_rating", TABLE, self.ratings.add_rating(rating))
            .await?;

        if let Some(metrics) = self.store_tracing.metrics() {
            metrics.record_rating_submitted(score);
        }
        crate::info_with_trace!(rating_id = %stored.id, "Rating stored");

        Ok(stored)
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn ratings_for_item(&self, item_id: &str) -> ServiceResult<Vec<Rating>> {
        let ratings = self
            .store_tracing
            .trace_operation("ratings_for_item", TABLE, self.ratings.ratings_for_item(item_id))
            .await?;

        crate::info_with_trace!("Found {} ratings", ratings.len());
        Ok(ratings)
    }
}
