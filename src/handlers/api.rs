use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{error, info, instrument};

use super::errors::{bad_request, service_error_to_response, ApiError};
use crate::app::AppState;
use crate::models::{
    AuthUser, CreateFeedbackRequest, CreateRatingRequest, FeedbackResponse, FoodItemFilters,
    FoodItemResponse, Page, Pagination, RatingResponse, SortOrder, SortSpec, DEFAULT_PAGE,
    DEFAULT_PER_PAGE,
};

/// Query parameters for listing food items
#[derive(Debug, Default, Deserialize)]
pub struct ListItemsQuery {
    #[serde(alias = "search")]
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<Decimal>,
    pub max_rating: Option<Decimal>,
    /// Comma separated, all must be present on the item
    pub tags: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

// =============================================================================
// ITEM ENDPOINTS
// =============================================================================

/// List and search food items. No authentication required.
#[instrument(name = "list_items", skip(state, _user, query))]
pub async fn list_items(
    State(state): State<AppState>,
    _user: Option<AuthUser>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> Result<Json<Page<FoodItemResponse>>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        error!("Invalid query parameters: {}", rejection);
        bad_request(rejection.body_text())
    })?;

    let (filters, sort, pagination) = query_to_filters(query).map_err(|err| {
        error!("Invalid query parameters: {}", err);
        bad_request(err)
    })?;

    match state.items_service.query_items(filters, sort, pagination).await {
        Ok(page) => {
            info!("Successfully listed {} of {} items", page.items.len(), page.total);
            Ok(Json(page.map(|item| item.to_response())))
        }
        Err(err) => {
            error!("Failed to list items: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Get a specific food item by ID. No authentication required.
#[instrument(name = "get_item", skip(state, _user), fields(item_id = %item_id))]
pub async fn get_item(
    State(state): State<AppState>,
    _user: Option<AuthUser>,
    Path(item_id): Path<String>,
) -> Result<Json<FoodItemResponse>, ApiError> {
    match state.items_service.get_item(&item_id).await {
        Ok(item) => {
            info!("Successfully retrieved item: {}", item.name);
            Ok(Json(item.to_response()))
        }
        Err(err) => {
            error!("Failed to get item {}: {}", item_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// RATING ENDPOINTS
// =============================================================================

#[instrument(name = "create_rating", skip(state, user, request), fields(
    user_id = %user.id,
    item_id = %request.item_id,
    score = request.score,
))]
pub async fn create_rating(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    match state.ratings_service.add_rating(&user.id, request).await {
        Ok(rating) => {
            crate::info_with_trace!("Successfully stored rating {}", rating.id);
            Ok((StatusCode::CREATED, Json(rating.to_response())))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to store rating: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "ratings_for_item", skip(state, user), fields(user_id = %user.id, item_id = %item_id))]
pub async fn ratings_for_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<String>,
) -> Result<Json<Vec<RatingResponse>>, ApiError> {
    match state.ratings_service.ratings_for_item(&item_id).await {
        Ok(ratings) => Ok(Json(ratings.iter().map(|r| r.to_response()).collect())),
        Err(err) => {
            error!("Failed to list ratings for {}: {}", item_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// FEEDBACK ENDPOINTS
// =============================================================================

#[instrument(name = "create_feedback", skip(state, user, request), fields(
    user_id = %user.id,
    item_id = %request.item_id,
))]
pub async fn create_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), ApiError> {
    match state.feedback_service.add_feedback(&user.id, request).await {
        Ok(feedback) => {
            crate::info_with_trace!("Successfully stored feedback {}", feedback.id);
            Ok((StatusCode::CREATED, Json(feedback.to_response())))
        }
        Err(err) => {
            crate::error_with_trace!("Failed to store feedback: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

#[instrument(name = "feedback_for_item", skip(state, user), fields(user_id = %user.id, item_id = %item_id))]
pub async fn feedback_for_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<String>,
) -> Result<Json<Vec<FeedbackResponse>>, ApiError> {
    match state.feedback_service.feedback_for_item(&item_id).await {
        Ok(feedback) => Ok(Json(feedback.iter().map(|f| f.to_response()).collect())),
        Err(err) => {
            error!("Failed to list feedback for {}: {}", item_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Convert query parameters to filters, sorting and pagination.
/// Blank string parameters count as absent.
fn query_to_filters(
    query: ListItemsQuery,
) -> Result<(FoodItemFilters, SortSpec, Pagination), String> {
    let order = match non_blank(query.sort_order) {
        Some(order) => order.parse::<SortOrder>()?,
        None => SortOrder::default(),
    };

    let tags = non_blank(query.tags).map(|tags| {
        tags.split(',')
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(|tag| tag.to_string())
            .collect::<Vec<_>>()
    });

    let filters = FoodItemFilters {
        q: non_blank(query.q),
        category: non_blank(query.category),
        location: non_blank(query.location),
        min_price: query.min_price,
        max_price: query.max_price,
        min_rating: query.min_rating,
        max_rating: query.max_rating,
        tags: tags.filter(|tags| !tags.is_empty()),
    };

    let sort = SortSpec::new(non_blank(query.sort_by), order);
    let pagination = Pagination::new(
        query.page.unwrap_or(DEFAULT_PAGE),
        query.per_page.unwrap_or(DEFAULT_PER_PAGE),
    );

    Ok((filters, sort, pagination))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortField;
    use rust_decimal_macros::dec;

    #[test]
    fn test_query_to_filters() {
        let query = ListItemsQuery {
            q: Some("cake".to_string()),
            category: Some("Dessert".to_string()),
            location: Some("".to_string()),
            min_price: Some(dec!(5.00)),
            max_price: Some(dec!(20.00)),
            tags: Some("chocolate, dessert,".to_string()),
            sort_by: Some("price".to_string()),
            sort_order: Some("DESC".to_string()),
            page: Some(2),
            per_page: Some(5),
            ..Default::default()
        };

        let (filters, sort, pagination) = query_to_filters(query).unwrap();

        assert_eq!(filters.q.as_deref(), Some("cake"));
        assert_eq!(filters.category.as_deref(), Some("Dessert"));
        assert_eq!(filters.location, None);
        assert_eq!(filters.min_price, Some(dec!(5.00)));
        assert_eq!(
            filters.tags,
            Some(vec!["chocolate".to_string(), "dessert".to_string()])
        );
        assert_eq!(sort.field(), Some(SortField::Price));
        assert_eq!(sort.order, SortOrder::Desc);
        assert_eq!(pagination, Pagination::new(2, 5));
    }

    #[test]
    fn test_query_defaults() {
        let (filters, sort, pagination) = query_to_filters(ListItemsQuery::default()).unwrap();

        assert_eq!(filters, FoodItemFilters::default());
        assert_eq!(sort, SortSpec::default());
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn test_unknown_sort_key_is_kept_but_invalid_order_rejected() {
        let query = ListItemsQuery {
            sort_by: Some("popularity".to_string()),
            ..Default::default()
        };
        let (_, sort, _) = query_to_filters(query).unwrap();
        assert_eq!(sort.field(), None);

        let query = ListItemsQuery {
            sort_order: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(query_to_filters(query).is_err());
    }
}
