//! Stockpile Server
//!
//! HTTP surface for the stockpile inventory API.

pub mod http;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use stockpile_core::{ItemService, ItemStore};

/// Shared application state
pub struct AppState {
    pub service: ItemService,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            service: ItemService::new(store),
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Item endpoints; the static /item/batch segment takes
        // priority over the {id} capture
        .route("/item", post(http::create_item))
        .route("/item", get(http::list_items))
        .route("/item/batch", delete(http::delete_batch))
        .route("/item/{id}", get(http::get_item))
        .route("/item/{id}", put(http::update_item))
        .route("/item/{id}", delete(http::delete_item))
        // System endpoints
        .route("/health", get(http::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Stockpile server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
