use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::food::generate_id;
use super::FeedbackStatus;

/// Free-text feedback left by a user on a food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub item_id: String,
    pub user_id: String,
    pub message: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for submitting feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    pub item_id: String,
    pub message: String,
}

/// Query model for moderating feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerateFeedbackRequest {
    pub status: FeedbackStatus,
}

/// Response model for feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub item_id: String,
    pub user_id: String,
    pub message: String,
    pub status: FeedbackStatus,
}

impl Feedback {
    /// New feedback always starts out pending
    pub fn new(user_id: String, request: CreateFeedbackRequest) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id("FB"),
            item_id: request.item_id,
            user_id,
            message: request.message,
            status: FeedbackStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: FeedbackStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn to_response(&self) -> FeedbackResponse {
        FeedbackResponse {
            id: self.id.clone(),
            item_id: self.item_id.clone(),
            user_id: self.user_id.clone(),
            message: self.message.clone(),
            status: self.status,
        }
    }
}
