use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use foodexplorer_rs::{
    build_state, create_app, init_observability, shutdown_observability, Config, Metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment()?;
    println!("Configuration loaded successfully");

    init_observability(&config.observability)?;

    info!("Starting {} service", config.observability.service_name);
    info!(
        "Service: {} v{} ({})",
        config.app.app_name, config.observability.service_version, config.app.environment
    );

    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    let state = build_state(&config, metrics);
    let item_count = state.items_service.count_items().await?;
    info!("Services initialized successfully, catalog holds {} items", item_count);

    let app = create_app(state, &config);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_observability().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
