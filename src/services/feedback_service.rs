use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    CreateFeedbackRequest, Feedback, FeedbackStatus, ServiceError, ServiceResult, Validate,
};
use crate::observability::{Metrics, StoreTracingMiddleware};
use crate::repositories::FeedbackRepository;

const TABLE: &str = "feedback";

/// Feedback submission and moderation
pub struct FeedbackService {
    repository: Arc<dyn FeedbackRepository>,
    store_tracing: StoreTracingMiddleware,
}

impl FeedbackService {
    pub fn new(repository: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            repository,
            store_tracing: StoreTracingMiddleware::default(),
        }
    }

    pub fn new_with_metrics(repository: Arc<dyn FeedbackRepository>, metrics: Arc<Metrics>) -> Self {
        Self {
            repository,
            store_tracing: StoreTracingMiddleware::new(Some(metrics)),
        }
    }

    /// New feedback starts out pending
    #[instrument(skip(self, request), fields(item_id = %request.item_id, user_id = %user_id))]
    pub async fn add_feedback(
        &self,
        user_id: &str,
        request: CreateFeedbackRequest,
    ) -> ServiceResult<Feedback> {
        crate::info_with_trace!("Submitting feedback");

        if let Err(e) = request.validate() {
            self.record("create", false);
            return Err(e.into());
        }

        let feedback = Feedback::new(user_id.to_string(), request);
        let stored = self
            .store_tracing
            .trace_operation("add_feedback", TABLE, self.repository.add_feedback(feedback))
            .await?;

        crate::info_with_trace!(feedback_id = %stored.id, "Feedback stored");
        self.record("create", true);

        Ok(stored)
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn feedback_for_item(&self, item_id: &str) -> ServiceResult<Vec<Feedback>> {
        let feedback = self
            .store_tracing
            .trace_operation(
                "feedback_for_item",
                TABLE,
                self.repository.feedback_for_item(item_id),
            )
            .await?;

        crate::info_with_trace!("Found {} feedback entries", feedback.len());
        Ok(feedback)
    }

    #[instrument(skip(self), fields(id = %id, status = %status))]
    pub async fn set_status(&self, id: &str, status: FeedbackStatus) -> ServiceResult<Feedback> {
        crate::info_with_trace!("Moderating feedback");

        match self
            .store_tracing
            .trace_operation(
                "set_feedback_status",
                TABLE,
                self.repository.set_feedback_status(id, status),
            )
            .await?
        {
            Some(feedback) => {
                self.record("moderate", true);
                Ok(feedback)
            }
            None => {
                crate::warn_with_trace!("Feedback not found");
                self.record("moderate", false);
                Err(ServiceError::FeedbackNotFound { id: id.to_string() })
            }
        }
    }

    fn record(&self, operation: &str, success: bool) {
        if let Some(metrics) = self.store_tracing.metrics() {
            metrics.record_feedback_operation(operation, success);
        }
    }
}
