use rust_decimal_macros::dec;

use crate::models::{CreateFoodItemRequest, FoodItem};

/// Demo catalog loaded by `InMemoryStore::seeded`
pub fn seed_items() -> Vec<FoodItem> {
    vec![
        FoodItem::new(CreateFoodItemRequest {
            name: "Margherita Pizza".to_string(),
            description: "Classic pizza with tomatoes, mozzarella, and basil.".to_string(),
            category: "Main Course".to_string(),
            price: dec!(12.5),
            currency: "USD".to_string(),
            location: "Naples".to_string(),
            tags: tags(&["pizza", "italian", "vegetarian"]),
        })
        .with_rating_summary(dec!(4.5), 10),
        FoodItem::new(CreateFoodItemRequest {
            name: "Sushi Platter".to_string(),
            description: "Assorted sushi with fresh fish and rice.".to_string(),
            category: "Main Course".to_string(),
            price: dec!(22.0),
            currency: "USD".to_string(),
            location: "Tokyo".to_string(),
            tags: tags(&["sushi", "japanese", "seafood"]),
        })
        .with_rating_summary(dec!(4.7), 25),
        FoodItem::new(CreateFoodItemRequest {
            name: "Chocolate Lava Cake".to_string(),
            description: "Warm chocolate cake with molten center.".to_string(),
            category: "Dessert".to_string(),
            price: dec!(7.0),
            currency: "USD".to_string(),
            location: "Paris".to_string(),
            tags: tags(&["dessert", "chocolate"]),
        })
        .with_rating_summary(dec!(4.2), 18),
    ]
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|tag| tag.to_string()).collect()
}
