use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use foodexplorer_rs::models::{FeedbackResponse, FoodItemResponse, Page, TokenResponse};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;
use common::*;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn new_item_body() -> Value {
    json!({
        "name": "Pad Thai",
        "description": "Stir-fried rice noodles with tamarind and peanuts.",
        "category": "Main Course",
        "price": "11.75",
        "currency": "THB",
        "location": "Bangkok",
        "tags": ["noodles", "thai"]
    })
}

#[tokio::test]
async fn test_health_endpoints() {
    for uri in ["/", "/health/status"] {
        let response = seeded_router().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }
}

#[tokio::test]
async fn test_list_items_default_page() {
    let response = seeded_router().oneshot(get("/items")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_items_search_filter_and_sort() {
    let app = seeded_router();

    let response = app.clone().oneshot(get("/items?q=CAKE")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Chocolate Lava Cake");

    let response = app
        .clone()
        .oneshot(get("/items?tags=pizza,seafood"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["total"], 0);

    let response = app
        .clone()
        .oneshot(get("/items?sort_by=price&sort_order=desc"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["Sushi Platter", "Margherita Pizza", "Chocolate Lava Cake"]
    );

    // Unknown sort keys leave the catalog order alone
    let response = app
        .oneshot(get("/items?sort_by=popularity"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["items"][0]["name"], "Margherita Pizza");
}

#[tokio::test]
async fn test_list_items_page_past_end() {
    let response = seeded_router()
        .oneshot(get("/items?page=100&per_page=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_items_rejects_invalid_parameters() {
    let app = seeded_router();
    for uri in [
        "/items?per_page=101",
        "/items?page=0",
        "/items?sort_order=sideways",
        "/items?min_price=-1",
        "/items?max_rating=6",
        "/items?page=abc",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_repeated_item_reads_are_identical() {
    let app = seeded_router();

    let page = body_json(app.clone().oneshot(get("/items")).await.unwrap()).await;
    let id = page["items"][0]["id"].as_str().unwrap().to_string();
    let uri = format!("/items/{}", id);

    let first = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    let second = body_json(app.oneshot(get(&uri)).await.unwrap()).await;

    assert_eq!(first, second);
    assert_eq!(first["id"], id.as_str());
    assert!(first["price"].is_number());
    assert!(first["avg_rating"].is_number());
}

#[tokio::test]
async fn test_price_bounds_accept_extra_precision() {
    let response = seeded_router()
        .oneshot(get("/items?min_price=12.505"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: Page<FoodItemResponse> = serde_json::from_value(body_json(response).await).unwrap();
    assert!(page.items.iter().all(|item| item.price >= dec!(12.505)));
}

#[tokio::test]
async fn test_get_missing_item_is_not_found() {
    let response = seeded_router()
        .oneshot(get("/items/Imissing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_json(response).await["timestamp"].is_string());
}

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = seeded_router();

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/items", None, new_item_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/items",
            Some("not-a-token"),
            new_item_body(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/items",
            Some(USER_TOKEN),
            new_item_body(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_item_lifecycle() {
    let app = seeded_router();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/items",
            Some(ADMIN_TOKEN),
            new_item_body(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: FoodItemResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(created.rating_count, 0);
    assert_eq!(created.price, dec!(11.75));

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            &format!("/items/{}", created.id),
            Some(ADMIN_TOKEN),
            json!({ "price": "12.25" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: FoodItemResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(updated.price, dec!(12.25));
    assert_eq!(updated.name, "Pad Thai");
    assert_eq!(updated.tags, created.tags);

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/items/{}", created.id))
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/items/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_item_validation_error() {
    let mut body = new_item_body();
    body["currency"] = json!("dollars");

    let response = seeded_router()
        .oneshot(json_request(Method::POST, "/items", Some(ADMIN_TOKEN), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ratings")
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::AUTHORIZATION, format!("Bearer {}", USER_TOKEN))
        .body(Body::from("score=5"))
        .unwrap();

    let response = seeded_router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_requests() {
    let app = seeded_router();
    app.clone().oneshot(get("/items")).await.unwrap();

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("store_operations_total"));
    assert!(text.contains("item_operations_total"));
}

// =============================================================================
// END-TO-END OVER HTTP
// =============================================================================

#[tokio::test]
async fn test_mock_login_and_me() {
    let env = TestEnvironment::new().await;

    let response = env
        .client
        .post(env.url("/auth/token?email=test@admin.com"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);
    let token: TokenResponse = response.json().await.unwrap();
    assert_eq!(token.access_token, ADMIN_TOKEN);
    assert_eq!(token.token_type, "bearer");

    let response = env
        .client
        .get(env.url("/auth/me"))
        .bearer_auth(&token.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["role"], "admin");
    assert_eq!(me["id"], "12345");

    let response = env.client.get(env.url("/auth/me")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn test_rating_updates_item_average() {
    let env = TestEnvironment::new().await;

    let page: Page<FoodItemResponse> = env
        .client
        .get(env.url("/items?q=lava"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let cake = &page.items[0];
    assert_eq!(cake.avg_rating, dec!(4.2));
    assert_eq!(cake.rating_count, 18);

    let response = env
        .client
        .post(env.url("/ratings"))
        .bearer_auth(USER_TOKEN)
        .json(&json!({ "item_id": cake.id, "score": 5, "comment": "Gooey" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let rating: Value = response.json().await.unwrap();
    assert_eq!(rating["user_id"], "67890");

    let item: FoodItemResponse = env
        .client
        .get(env.url(&format!("/items/{}", cake.id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    // (4.2 * 18 + 5) / 19 = 4.2421..
    assert_eq!(item.avg_rating, dec!(4.24));
    assert_eq!(item.rating_count, 19);

    let ratings: Vec<Value> = env
        .client
        .get(env.url(&format!("/ratings/item/{}", cake.id)))
        .bearer_auth(USER_TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ratings.len(), 1);

    let response = env
        .client
        .post(env.url("/ratings"))
        .bearer_auth(USER_TOKEN)
        .json(&json!({ "item_id": cake.id, "score": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = env
        .client
        .post(env.url("/ratings"))
        .bearer_auth(USER_TOKEN)
        .json(&json!({ "item_id": "Imissing", "score": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    assert!(
        env.metrics
            .ratings_submitted_total
            .with_label_values(&["5"])
            .get()
            >= 1.0
    );
}

#[tokio::test]
async fn test_feedback_moderation_flow() {
    let env = TestEnvironment::new().await;

    let page: Page<FoodItemResponse> = env
        .client
        .get(env.url("/items?tags=sushi"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sushi = &page.items[0];

    let response = env
        .client
        .post(env.url("/feedback"))
        .bearer_auth(USER_TOKEN)
        .json(&json!({ "item_id": sushi.id, "message": "More wasabi please" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let feedback: FeedbackResponse = response.json().await.unwrap();
    assert_eq!(feedback.status.to_string(), "pending");

    let moderate_url = env.url(&format!(
        "/admin/feedback/{}/status?status=approved",
        feedback.id
    ));

    let response = env
        .client
        .patch(&moderate_url)
        .bearer_auth(USER_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    let response = env
        .client
        .patch(&moderate_url)
        .bearer_auth(ADMIN_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let moderated: FeedbackResponse = response.json().await.unwrap();
    assert_eq!(moderated.status.to_string(), "approved");

    let response = env
        .client
        .patch(env.url(&format!(
            "/admin/feedback/{}/status?status=pending",
            feedback.id
        )))
        .bearer_auth(ADMIN_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = env
        .client
        .patch(env.url("/admin/feedback/FBmissing/status?status=rejected"))
        .bearer_auth(ADMIN_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let entries: Vec<FeedbackResponse> = env
        .client
        .get(env.url(&format!("/feedback/item/{}", sushi.id)))
        .bearer_auth(USER_TOKEN)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status.to_string(), "approved");
}
