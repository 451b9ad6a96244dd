use rust_decimal::Decimal;
use std::collections::HashSet;

use super::{
    CreateFeedbackRequest, CreateFoodItemRequest, CreateRatingRequest, FoodItemFilters,
    Pagination, UpdateFoodItemRequest, ValidationError, ValidationResult,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MAX_ITEM_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
pub const MAX_CATEGORY_LENGTH: usize = 100;
pub const MAX_LOCATION_LENGTH: usize = 100;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_TAGS_COUNT: usize = 20;
pub const MAX_COMMENT_LENGTH: usize = 1000;
pub const MAX_FEEDBACK_LENGTH: usize = 2000;
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
pub const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
pub const MIN_PER_PAGE: u32 = 1;
pub const MAX_PER_PAGE: u32 = 100;

impl Validate for CreateFoodItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_item_name(&self.name)?;
        validate_description(&self.description)?;
        validate_required_text("category", &self.category, MAX_CATEGORY_LENGTH)?;
        validate_price("price", &self.price)?;
        validate_currency(&self.currency)?;
        validate_required_text("location", &self.location, MAX_LOCATION_LENGTH)?;
        validate_tags(&self.tags)?;
        Ok(())
    }
}

impl Validate for UpdateFoodItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_item_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(category) = &self.category {
            validate_required_text("category", category, MAX_CATEGORY_LENGTH)?;
        }
        if let Some(price) = &self.price {
            validate_price("price", price)?;
        }
        if let Some(currency) = &self.currency {
            validate_currency(currency)?;
        }
        if let Some(location) = &self.location {
            validate_required_text("location", location, MAX_LOCATION_LENGTH)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }
}

impl Validate for CreateRatingRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_entity_id("item_id", &self.item_id)?;
        validate_score(self.score)?;
        if let Some(comment) = &self.comment {
            validate_max_length("comment", comment, MAX_COMMENT_LENGTH)?;
        }
        Ok(())
    }
}

impl Validate for CreateFeedbackRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_entity_id("item_id", &self.item_id)?;
        validate_required_text("message", &self.message, MAX_FEEDBACK_LENGTH)?;
        Ok(())
    }
}

impl Validate for Pagination {
    fn validate(&self) -> ValidationResult<()> {
        if self.page < 1 {
            return Err(ValidationError::OutOfRange {
                field: "page".to_string(),
                min: "1".to_string(),
                max: u32::MAX.to_string(),
                value: self.page.to_string(),
            });
        }

        if !(MIN_PER_PAGE..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(ValidationError::OutOfRange {
                field: "per_page".to_string(),
                min: MIN_PER_PAGE.to_string(),
                max: MAX_PER_PAGE.to_string(),
                value: self.per_page.to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for FoodItemFilters {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(min_price) = &self.min_price {
            validate_price_bound("min_price", min_price)?;
        }
        if let Some(max_price) = &self.max_price {
            validate_price_bound("max_price", max_price)?;
        }
        if let Some(min_rating) = &self.min_rating {
            validate_rating_bound("min_rating", min_rating)?;
        }
        if let Some(max_rating) = &self.max_rating {
            validate_rating_bound("max_rating", max_rating)?;
        }
        Ok(())
    }
}

/// Validate item name
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_required_text("name", name, MAX_ITEM_NAME_LENGTH)?;

    if name
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: name.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate item description
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_required_text("description", description, MAX_DESCRIPTION_LENGTH)
}

/// Price filter bounds only need to be non-negative
pub fn validate_price_bound(field: &str, value: &Decimal) -> ValidationResult<()> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Price bound cannot be negative".to_string(),
        });
    }

    Ok(())
}

/// Prices are non-negative with at most two decimal places
pub fn validate_price(field: &str, price: &Decimal) -> ValidationResult<()> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: price.to_string(),
            reason: "Price cannot be negative".to_string(),
        });
    }

    if price.scale() > 2 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: price.to_string(),
            reason: "Price cannot have more than 2 decimal places".to_string(),
        });
    }

    Ok(())
}

/// ISO 4217 style code: exactly three ASCII letters
pub fn validate_currency(currency: &str) -> ValidationResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            expected: "Three-letter currency code (e.g., USD)".to_string(),
        });
    }

    Ok(())
}

/// Validate tag list: bounded count, no blanks, no case-insensitive duplicates
pub fn validate_tags(tags: &[String]) -> ValidationResult<()> {
    if tags.len() > MAX_TAGS_COUNT {
        return Err(ValidationError::InvalidValue {
            field: "tags".to_string(),
            value: tags.len().to_string(),
            reason: format!("Too many tags, maximum allowed: {}", MAX_TAGS_COUNT),
        });
    }

    let mut seen_tags = HashSet::new();

    for (index, tag) in tags.iter().enumerate() {
        let trimmed = tag.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("tags[{}]", index),
                value: tag.clone(),
                reason: "Tag cannot be empty".to_string(),
            });
        }

        if trimmed.len() > MAX_TAG_LENGTH {
            return Err(ValidationError::TooLong {
                field: format!("tags[{}]", index),
                max_length: MAX_TAG_LENGTH,
                actual_length: trimmed.len(),
            });
        }

        if !seen_tags.insert(trimmed.to_lowercase()) {
            return Err(ValidationError::InvalidValue {
                field: "tags".to_string(),
                value: tag.clone(),
                reason: "Duplicate tag found".to_string(),
            });
        }
    }

    Ok(())
}

/// Rating scores are whole stars from 1 to 5
pub fn validate_score(score: u8) -> ValidationResult<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ValidationError::OutOfRange {
            field: "score".to_string(),
            min: MIN_SCORE.to_string(),
            max: MAX_SCORE.to_string(),
            value: score.to_string(),
        });
    }

    Ok(())
}

/// Bounds on avg_rating must lie within 0..=5
pub fn validate_rating_bound(field: &str, value: &Decimal) -> ValidationResult<()> {
    if *value < Decimal::ZERO || *value > MAX_RATING {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: MAX_RATING.to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

/// Ids are a letter prefix followed by alphanumerics, e.g. `I1a2b3c4d`
pub fn validate_entity_id(field: &str, id: &str) -> ValidationResult<()> {
    let trimmed = id.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            expected: "Alphanumeric identifier".to_string(),
        });
    }

    Ok(())
}

fn validate_required_text(field: &str, value: &str, max_length: usize) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    validate_max_length(field, value, max_length)
}

fn validate_max_length(field: &str, value: &str, max_length: usize) -> ValidationResult<()> {
    let actual_length = value.trim().chars().count();
    if actual_length > max_length {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length,
            actual_length,
        });
    }

    Ok(())
}
