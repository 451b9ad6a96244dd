#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use foodexplorer_rs::{
    app::AppState, create_app, repositories::InMemoryStore, Config, Metrics,
};
use reqwest::Client;
use tokio::net::TcpListener;

pub const ADMIN_TOKEN: &str = "admin:12345:test@admin.com";
pub const USER_TOKEN: &str = "user:67890:diner@example.com";

pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub metrics: Arc<Metrics>,
}

/// Router over a freshly seeded store, for `oneshot` tests
pub fn seeded_router() -> Router {
    router_with_store(Arc::new(InMemoryStore::seeded()))
}

pub fn router_with_store(store: Arc<InMemoryStore>) -> Router {
    let config = Config::default();
    let metrics = Arc::new(Metrics::new().unwrap());
    let state = AppState::new(store, metrics, config.app.admin_email.clone());
    create_app(state, &config)
}

impl TestEnvironment {
    /// Serve the real router on an ephemeral port
    pub async fn new() -> Self {
        let config = Config::default();
        let metrics = Arc::new(Metrics::new().unwrap());
        let state = AppState::new(
            Arc::new(InMemoryStore::seeded()),
            metrics.clone(),
            config.app.admin_email.clone(),
        );
        let app = create_app(state, &config);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        Self {
            client,
            base_url: format!("http://{}", addr),
            metrics,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
