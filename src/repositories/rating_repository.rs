use async_trait::async_trait;

use crate::models::{Rating, RepositoryResult};

#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Store a rating and fold its score into the referenced item, if that
    /// item still exists
    async fn add_rating(&self, rating: Rating) -> RepositoryResult<Rating>;

    /// Ratings for one item, oldest first
    async fn ratings_for_item(&self, item_id: &str) -> RepositoryResult<Vec<Rating>>;
}
