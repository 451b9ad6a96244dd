// Services module - business logic layer

pub mod feedback_service;
pub mod items_service;
pub mod ratings_service;

pub use feedback_service::FeedbackService;
pub use items_service::ItemsService;
pub use ratings_service::RatingsService;
