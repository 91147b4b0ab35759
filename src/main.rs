use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tripshape::config::Config;
use tripshape::services::llm::GroqClient;
use tripshape::services::openrouteservice::OpenRouteServiceClient;
use tripshape::services::trip_planner::TripPlanner;
use tripshape::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripshape=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting TripShape API server");
    tracing::info!(
        model = %config.llm_model,
        routing = %config.openrouteservice_base_url,
        presets = config.planner.use_presets,
        "Configuration loaded successfully"
    );

    // Initialize external clients
    let llm = GroqClient::new(
        config.groq_api_key.clone(),
        config.groq_base_url.clone(),
        config.llm_model.clone(),
        config.planner.llm_timeout,
    )?;
    let routing = OpenRouteServiceClient::new(
        config.openrouteservice_api_key.clone(),
        config.openrouteservice_base_url.clone(),
        config.planner.snap_timeout,
        config.planner.directions_timeout,
    );
    let trip_planner = TripPlanner::new(Arc::new(llm), Arc::new(routing), config.planner.clone());

    // Create application state
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState {
        trip_planner,
        shutdown: shutdown.clone(),
        llm_model: config.llm_model.clone(),
        routing_base_url: config.openrouteservice_base_url.clone(),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", tripshape::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C, cancelling in-flight trip plans first
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, cancelling in-flight plans");
    shutdown.cancel();
}
