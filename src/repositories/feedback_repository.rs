use async_trait::async_trait;

use crate::models::{Feedback, FeedbackStatus, RepositoryResult};

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn add_feedback(&self, feedback: Feedback) -> RepositoryResult<Feedback>;

    /// Feedback for one item, oldest first
    async fn feedback_for_item(&self, item_id: &str) -> RepositoryResult<Vec<Feedback>>;

    /// Change the moderation status, returning `None` if the feedback is unknown
    async fn set_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> RepositoryResult<Option<Feedback>>;
}
