use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::{seed, FeedbackRepository, FoodItemRepository, RatingRepository};
use crate::models::{
    Feedback, FeedbackStatus, FoodItem, Rating, RepositoryError, RepositoryResult,
    UpdateFoodItemRequest,
};

const ITEMS_TABLE: &str = "items";
const RATINGS_TABLE: &str = "ratings";
const FEEDBACK_TABLE: &str = "feedback";

/// Records with a string id
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for FoodItem {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Rating {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Feedback {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Map by id that iterates in insertion order
#[derive(Debug, Clone)]
pub struct Table<T> {
    name: &'static str,
    rows: HashMap<String, T>,
    order: Vec<String>,
}

impl<T: Keyed + Clone> Table<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, row: T) -> RepositoryResult<()> {
        let id = row.key().to_string();
        if self.rows.contains_key(&id) {
            return Err(RepositoryError::DuplicateKey {
                table: self.name.to_string(),
                id,
            });
        }
        self.order.push(id.clone());
        self.rows.insert(id, row);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.rows.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let row = self.rows.remove(id)?;
        self.order.retain(|key| key != id);
        Some(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.rows.get(id))
    }

    /// Owned copy of every row in insertion order
    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.order.clear();
    }
}

#[derive(Debug)]
struct StoreState {
    items: Table<FoodItem>,
    ratings: Table<Rating>,
    feedback: Table<Feedback>,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            items: Table::new(ITEMS_TABLE),
            ratings: Table::new(RATINGS_TABLE),
            feedback: Table::new(FEEDBACK_TABLE),
        }
    }
}

/// Process-local store for items, ratings and feedback.
///
/// All three tables sit behind one `RwLock`. Reads share the lock, every
/// mutation takes it exclusively, so a rating insert and its aggregation
/// into the item are observed together or not at all.
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::empty()),
        }
    }

    /// Store preloaded with the demo catalog
    pub fn seeded() -> Self {
        let mut state = StoreState::empty();
        for item in seed::seed_items() {
            if let Err(e) = state.items.insert(item) {
                warn!("Skipping seed item: {}", e);
            }
        }
        info!(items = state.items.len(), "Loaded seed data");

        Self {
            state: RwLock::new(state),
        }
    }

    /// Drop every record in all three tables
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.items.clear();
        state.ratings.clear();
        state.feedback.clear();
        info!("Store cleared");
    }

    pub async fn count_items(&self) -> usize {
        self.state.read().await.items.len()
    }
}

#[async_trait]
impl FoodItemRepository for InMemoryStore {
    #[instrument(skip(self), fields(table = ITEMS_TABLE))]
    async fn find_all(&self) -> RepositoryResult<Vec<FoodItem>> {
        let items = self.state.read().await.items.snapshot();
        info!("Found {} items", items.len());
        Ok(items)
    }

    #[instrument(skip(self), fields(table = ITEMS_TABLE, id = %id))]
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<FoodItem>> {
        let item = self.state.read().await.items.get(id).cloned();
        if item.is_none() {
            info!("Item not found");
        }
        Ok(item)
    }

    #[instrument(skip(self, item), fields(table = ITEMS_TABLE, id = %item.id))]
    async fn create(&self, item: FoodItem) -> RepositoryResult<FoodItem> {
        self.state.write().await.items.insert(item.clone())?;
        info!("Item created successfully");
        Ok(item)
    }

    #[instrument(skip(self, patch), fields(table = ITEMS_TABLE, id = %id))]
    async fn update(
        &self,
        id: &str,
        patch: UpdateFoodItemRequest,
    ) -> RepositoryResult<Option<FoodItem>> {
        let mut state = self.state.write().await;
        let Some(item) = state.items.get_mut(id) else {
            info!("Item not found");
            return Ok(None);
        };

        item.apply_update(patch);
        info!("Item updated successfully");
        Ok(Some(item.clone()))
    }

    #[instrument(skip(self), fields(table = ITEMS_TABLE, id = %id))]
    async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let removed = self.state.write().await.items.remove(id).is_some();
        info!(removed, "Item delete processed");
        Ok(removed)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.count_items().await)
    }
}

#[async_trait]
impl RatingRepository for InMemoryStore {
    #[instrument(skip(self, rating), fields(table = RATINGS_TABLE, item_id = %rating.item_id))]
    async fn add_rating(&self, rating: Rating) -> RepositoryResult<Rating> {
        let mut state = self.state.write().await;
        state.ratings.insert(rating.clone())?;

        match state.items.get_mut(&rating.item_id) {
            Some(item) => {
                item.record_rating(rating.score);
                info!(
                    avg_rating = %item.avg_rating,
                    rating_count = item.rating_count,
                    "Rating aggregated"
                );
            }
            None => warn!("Rated item no longer exists, skipping aggregation"),
        }

        Ok(rating)
    }

    #[instrument(skip(self), fields(table = RATINGS_TABLE, item_id = %item_id))]
    async fn ratings_for_item(&self, item_id: &str) -> RepositoryResult<Vec<Rating>> {
        let state = self.state.read().await;
        Ok(state
            .ratings
            .iter()
            .filter(|rating| rating.item_id == item_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    #[instrument(skip(self, feedback), fields(table = FEEDBACK_TABLE, item_id = %feedback.item_id))]
    async fn add_feedback(&self, feedback: Feedback) -> RepositoryResult<Feedback> {
        self.state.write().await.feedback.insert(feedback.clone())?;
        info!("Feedback stored");
        Ok(feedback)
    }

    #[instrument(skip(self), fields(table = FEEDBACK_TABLE, item_id = %item_id))]
    async fn feedback_for_item(&self, item_id: &str) -> RepositoryResult<Vec<Feedback>> {
        let state = self.state.read().await;
        Ok(state
            .feedback
            .iter()
            .filter(|feedback| feedback.item_id == item_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self), fields(table = FEEDBACK_TABLE, id = %id, status = %status))]
    async fn set_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> RepositoryResult<Option<Feedback>> {
        let mut state = self.state.write().await;
        let Some(feedback) = state.feedback.get_mut(id) else {
            info!("Feedback not found");
            return Ok(None);
        };

        feedback.set_status(status);
        info!("Feedback status updated");
        Ok(Some(feedback.clone()))
    }
}
