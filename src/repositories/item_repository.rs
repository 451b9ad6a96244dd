use async_trait::async_trait;

use crate::models::{FoodItem, RepositoryResult, UpdateFoodItemRequest};

/// Trait defining the interface for food item data access operations
#[async_trait]
pub trait FoodItemRepository: Send + Sync {
    /// Snapshot of every item in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<FoodItem>>;

    /// Find an item by its ID
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<FoodItem>>;

    /// Insert a new item. Fails with `DuplicateKey` if the id is taken.
    async fn create(&self, item: FoodItem) -> RepositoryResult<FoodItem>;

    /// Apply a merge patch, returning the updated item or `None` if absent
    async fn update(
        &self,
        id: &str,
        patch: UpdateFoodItemRequest,
    ) -> RepositoryResult<Option<FoodItem>>;

    /// Remove an item. Returns whether it existed. Ratings and feedback are left in place.
    async fn delete(&self, id: &str) -> RepositoryResult<bool>;

    async fn count(&self) -> RepositoryResult<usize>;
}
