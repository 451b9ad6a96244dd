use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::running_average;

/// Core food item model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub currency: String,
    pub location: String,
    pub tags: Vec<String>,
    pub avg_rating: Decimal,
    pub rating_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a new food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodItemRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub currency: String,
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Merge patch for an existing food item. `None` leaves the field untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateFoodItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub currency: Option<String>,
    pub location: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Filters for querying food items. Every filter is optional and they combine with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FoodItemFilters {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<Decimal>,
    pub max_rating: Option<Decimal>,
    pub tags: Option<Vec<String>>,
}

/// Response model for a food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItemResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub currency: String,
    pub location: String,
    pub tags: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_rating: Decimal,
    pub rating_count: u32,
}

/// Short random identifier with a type prefix, e.g. `I1a2b3c4d`
pub(crate) fn generate_id(prefix: &str) -> String {
    format!(
        "{}{}",
        prefix,
        Uuid::new_v4()
            .simple()
            .to_string()
            .get(0..8)
            .unwrap_or("00000000")
    )
}

impl FoodItem {
    /// Create a new FoodItem with generated ID, timestamps and no ratings
    pub fn new(request: CreateFoodItemRequest) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id("I"),
            name: request.name,
            description: request.description,
            category: request.category,
            price: request.price,
            currency: request.currency,
            location: request.location,
            tags: request.tags,
            avg_rating: Decimal::ZERO,
            rating_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Preset rating summary, used for seed data
    pub fn with_rating_summary(mut self, avg_rating: Decimal, rating_count: u32) -> Self {
        self.avg_rating = avg_rating;
        self.rating_count = rating_count;
        self
    }

    /// Apply a merge patch. Only fields present in the request are written.
    pub fn apply_update(&mut self, request: UpdateFoodItemRequest) {
        if let Some(name) = request.name {
            self.name = name;
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(category) = request.category {
            self.category = category;
        }
        if let Some(price) = request.price {
            self.price = price;
        }
        if let Some(currency) = request.currency {
            self.currency = currency;
        }
        if let Some(location) = request.location {
            self.location = location;
        }
        if let Some(tags) = request.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Fold a new rating score into the running average.
    ///
    /// The average is rounded to two decimal places on every call, so after
    /// many ratings it drifts from the exact mean of all scores. This is the
    /// accepted approximation for an O(1) update.
    pub fn record_rating(&mut self, score: u8) {
        let (avg_rating, rating_count) = running_average(self.avg_rating, self.rating_count, score);
        self.avg_rating = avg_rating;
        self.rating_count = rating_count;
        self.updated_at = Utc::now();
    }

    /// Check if the item matches the given filters
    pub fn matches_filters(&self, filters: &FoodItemFilters) -> bool {
        if let Some(q) = non_empty(&filters.q) {
            let q_lower = q.to_lowercase();
            if !self.name.to_lowercase().contains(&q_lower)
                && !self.description.to_lowercase().contains(&q_lower)
                && !self
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&q_lower))
            {
                return false;
            }
        }

        if let Some(category) = non_empty(&filters.category) {
            if self.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }

        if let Some(location) = non_empty(&filters.location) {
            if self.location.to_lowercase() != location.to_lowercase() {
                return false;
            }
        }

        if let Some(min_price) = &filters.min_price {
            if &self.price < min_price {
                return false;
            }
        }

        if let Some(max_price) = &filters.max_price {
            if &self.price > max_price {
                return false;
            }
        }

        if let Some(min_rating) = &filters.min_rating {
            if &self.avg_rating < min_rating {
                return false;
            }
        }

        if let Some(max_rating) = &filters.max_rating {
            if &self.avg_rating > max_rating {
                return false;
            }
        }

        if let Some(tags) = &filters.tags {
            if !self.has_all_tags(tags) {
                return false;
            }
        }

        true
    }

    /// Case-insensitive subset test: every requested tag must be on the item
    pub fn has_all_tags(&self, requested: &[String]) -> bool {
        requested.iter().all(|wanted| {
            self.tags
                .iter()
                .any(|tag| tag.to_lowercase() == wanted.to_lowercase())
        })
    }

    /// Convert FoodItem to its API representation
    pub fn to_response(&self) -> FoodItemResponse {
        FoodItemResponse {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            price: self.price,
            currency: self.currency.clone(),
            location: self.location.clone(),
            tags: self.tags.clone(),
            avg_rating: self.avg_rating,
            rating_count: self.rating_count,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
