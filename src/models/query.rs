use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{FoodItem, FoodItemFilters, SortField, SortOrder};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Requested ordering of a listing. The key is kept as given; keys that are
/// not a known [`SortField`] leave the input order as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
}

/// 1-based offset pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

/// One page of a filtered listing. `total` counts the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
}

impl SortField {
    /// Ascending comparison of two items on this field
    pub fn compare(&self, a: &FoodItem, b: &FoodItem) -> Ordering {
        match self {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Price => a.price.cmp(&b.price),
            SortField::AvgRating => a.avg_rating.cmp(&b.avg_rating),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl SortSpec {
    pub fn new(sort_by: Option<String>, order: SortOrder) -> Self {
        Self { sort_by, order }
    }

    pub fn by(field: SortField, order: SortOrder) -> Self {
        Self::new(Some(field.to_string()), order)
    }

    pub fn field(&self) -> Option<SortField> {
        self.sort_by.as_deref().and_then(|key| key.parse().ok())
    }

    /// Stable sort in place. Equal keys keep their relative order in both directions.
    pub fn apply(&self, items: &mut [FoodItem]) {
        let Some(field) = self.field() else {
            return;
        };

        match self.order {
            SortOrder::Asc => items.sort_by(|a, b| field.compare(a, b)),
            SortOrder::Desc => items.sort_by(|a, b| field.compare(b, a)),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize)
    }
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Filter a snapshot of the catalog and order the survivors.
///
/// A full scan: items come in store order and leave in store order unless
/// `sort` names a known field.
pub fn query_items(
    items: Vec<FoodItem>,
    filters: &FoodItemFilters,
    sort: &SortSpec,
) -> Vec<FoodItem> {
    let mut matched: Vec<FoodItem> = items
        .into_iter()
        .filter(|item| item.matches_filters(filters))
        .collect();
    sort.apply(&mut matched);
    matched
}

/// Slice an ordered sequence. A page past the end is empty, not an error.
pub fn paginate<T>(items: Vec<T>, pagination: &Pagination) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.per_page as usize)
        .collect();

    Page {
        items,
        page: pagination.page,
        per_page: pagination.per_page,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateFoodItemRequest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn item(name: &str, price: Decimal, avg_rating: Decimal) -> FoodItem {
        FoodItem::new(CreateFoodItemRequest {
            name: name.to_string(),
            description: format!("{} description", name),
            category: "Main Course".to_string(),
            price,
            currency: "USD".to_string(),
            location: "Naples".to_string(),
            tags: vec![],
        })
        .with_rating_summary(avg_rating, 1)
    }

    fn names(items: &[FoodItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_name_is_case_insensitive() {
        let mut items = vec![
            item("banana split", dec!(5), dec!(0)),
            item("Apple pie", dec!(5), dec!(0)),
            item("cherry tart", dec!(5), dec!(0)),
        ];

        SortSpec::by(SortField::Name, SortOrder::Asc).apply(&mut items);
        assert_eq!(names(&items), ["Apple pie", "banana split", "cherry tart"]);

        SortSpec::by(SortField::Name, SortOrder::Desc).apply(&mut items);
        assert_eq!(names(&items), ["cherry tart", "banana split", "Apple pie"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut items = vec![
            item("first", dec!(7), dec!(0)),
            item("cheap", dec!(3), dec!(0)),
            item("second", dec!(7), dec!(0)),
        ];

        SortSpec::by(SortField::Price, SortOrder::Asc).apply(&mut items);
        assert_eq!(names(&items), ["cheap", "first", "second"]);

        SortSpec::by(SortField::Price, SortOrder::Desc).apply(&mut items);
        assert_eq!(names(&items), ["first", "second", "cheap"]);
    }

    #[test]
    fn test_sort_by_rating() {
        let mut items = vec![
            item("ok", dec!(1), dec!(3.9)),
            item("great", dec!(1), dec!(4.8)),
            item("fine", dec!(1), dec!(4.2)),
        ];

        SortSpec::by(SortField::AvgRating, SortOrder::Desc).apply(&mut items);
        assert_eq!(names(&items), ["great", "fine", "ok"]);
    }

    #[test]
    fn test_unknown_sort_key_keeps_input_order() {
        let mut items = vec![
            item("b", dec!(2), dec!(0)),
            item("a", dec!(1), dec!(0)),
        ];

        SortSpec::new(Some("popularity".to_string()), SortOrder::Desc).apply(&mut items);
        assert_eq!(names(&items), ["b", "a"]);

        SortSpec::default().apply(&mut items);
        assert_eq!(names(&items), ["b", "a"]);
    }

    #[test]
    fn test_query_items_filters_then_sorts() {
        let items = vec![
            item("Lava Cake", dec!(7), dec!(4.2)),
            item("Sushi", dec!(22), dec!(4.7)),
            item("Pizza", dec!(12.5), dec!(4.5)),
        ];
        let filters = FoodItemFilters {
            max_price: Some(dec!(15)),
            ..Default::default()
        };

        let result = query_items(
            items,
            &filters,
            &SortSpec::by(SortField::Price, SortOrder::Desc),
        );
        assert_eq!(names(&result), ["Pizza", "Lava Cake"]);
    }

    #[test]
    fn test_paginate_slices_and_reports_total() {
        let page = paginate((1..=25).collect::<Vec<_>>(), &Pagination::new(3, 10));
        assert_eq!(page.items, (21..=25).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.page, 3);
        assert_eq!(page.per_page, 10);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let page = paginate(vec!["a", "b", "c"], &Pagination::new(100, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.per_page, 10);
        assert_eq!(pagination.offset(), 0);
        assert_eq!(Pagination::new(4, 25).offset(), 75);
    }

    #[test]
    fn test_page_map() {
        let page = paginate(vec![1, 2, 3], &Pagination::new(1, 2)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 3);
    }
}
