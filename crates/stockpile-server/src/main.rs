//! Stockpile Server Binary
//!
//! Standalone server for the stockpile inventory API.

use std::sync::Arc;

use stockpile_core::SqliteItemStore;
use stockpile_server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("STOCKPILE_DB").unwrap_or_else(|_| "stockpile.db".to_string());
    let addr = std::env::var("STOCKPILE_ADDR").unwrap_or_else(|_| "127.0.0.1:3007".to_string());

    let store = SqliteItemStore::open(&db_path)?;
    tracing::info!("Opened item store at {}", db_path);

    let state = Arc::new(AppState::new(Arc::new(store)));
    serve(&addr, state).await
}
