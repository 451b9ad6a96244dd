use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, instrument};

use super::auth::require_admin;
use super::errors::{bad_request, service_error_to_response, ApiError};
use crate::app::AppState;
use crate::models::{
    AuthUser, CreateFoodItemRequest, FeedbackResponse, FeedbackStatus, FoodItemResponse,
    ModerateFeedbackRequest, UpdateFoodItemRequest,
};

// =============================================================================
// ITEM MANAGEMENT ENDPOINTS
// =============================================================================

/// Create a new food item (admin only)
#[instrument(name = "create_item", skip(state, user, request), fields(
    user_id = %user.id,
    item_name = %request.name,
    price = %request.price,
))]
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateFoodItemRequest>,
) -> Result<(StatusCode, Json<FoodItemResponse>), ApiError> {
    require_admin(&user)?;

    info!("Admin creating new item: {}", request.name);

    match state.items_service.create_item(request).await {
        Ok(item) => {
            info!("Successfully created item with ID: {}", item.id);
            Ok((StatusCode::CREATED, Json(item.to_response())))
        }
        Err(err) => {
            error!("Failed to create item: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Merge-patch an existing food item (admin only)
#[instrument(name = "update_item", skip(state, user, request), fields(
    user_id = %user.id,
    item_id = %item_id,
    item_name = request.name.as_deref(),
    price = request.price.as_ref().map(|p| p.to_string()).as_deref(),
))]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateFoodItemRequest>,
) -> Result<Json<FoodItemResponse>, ApiError> {
    require_admin(&user)?;

    info!("Admin updating item with ID: {}", item_id);

    match state.items_service.update_item(&item_id, request).await {
        Ok(item) => {
            info!("Successfully updated item: {}", item.name);
            Ok(Json(item.to_response()))
        }
        Err(err) => {
            error!("Failed to update item {}: {}", item_id, err);
            Err(service_error_to_response(err))
        }
    }
}

/// Delete a food item (admin only)
#[instrument(name = "delete_item", skip(state, user), fields(user_id = %user.id, item_id = %item_id))]
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&user)?;

    info!("Admin deleting item with ID: {}", item_id);

    match state.items_service.delete_item(&item_id).await {
        Ok(()) => {
            info!("Successfully deleted item: {}", item_id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            error!("Failed to delete item {}: {}", item_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// MODERATION ENDPOINTS
// =============================================================================

/// Approve or reject a feedback entry (admin only)
#[instrument(name = "moderate_feedback", skip(state, user, query), fields(
    user_id = %user.id,
    feedback_id = %feedback_id,
))]
pub async fn moderate_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Path(feedback_id): Path<String>,
    query: Result<Query<ModerateFeedbackRequest>, QueryRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    require_admin(&user)?;

    let Query(ModerateFeedbackRequest { status }) =
        query.map_err(|rejection| bad_request(rejection.body_text()))?;

    // Moderation only moves feedback out of pending
    if status == FeedbackStatus::Pending {
        return Err(bad_request("status must be approved or rejected"));
    }

    info!("Admin setting feedback {} to {}", feedback_id, status);

    match state.feedback_service.set_status(&feedback_id, status).await {
        Ok(feedback) => Ok(Json(feedback.to_response())),
        Err(err) => {
            error!("Failed to moderate feedback {}: {}", feedback_id, err);
            Err(service_error_to_response(err))
        }
    }
}
