mod config;
mod docs;
mod handlers;
mod models;
mod rooms;
mod routes;
mod services;
mod state;
mod store;
mod ws;

use std::panic;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use docs::ApiDoc;
use routes::api::app;
use state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "syncboard=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    let cors = match &config.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    let server_address = config.server_address();

    // Shared state: room registry, broadcaster, entity store, presence
    let state = AppState::new(config);

    // Combine all routes
    let app_routes = app(state)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start the HTTP server; the real-time socket is served on the same
    // listener at /ws.
    let listener = tokio::net::TcpListener::bind(&server_address)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", server_address));

    info!("🚀 Server running on http://{}", server_address);
    info!("📡 WebSocket available at ws://{}/ws", server_address);
    info!("📚 Swagger UI available at http://{}/swagger", server_address);

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
