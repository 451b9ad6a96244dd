// Repositories module - data access layer

pub mod feedback_repository;
pub mod item_repository;
pub mod memory_store;
pub mod rating_repository;
pub mod seed;


pub use feedback_repository::FeedbackRepository;
pub use item_repository::FoodItemRepository;
pub use memory_store::InMemoryStore;
pub use rating_repository::RatingRepository;
