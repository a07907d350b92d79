//! HTTP route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, SharedState};

/// Create the chat router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Legacy launcher endpoints
        .route("/chat/get.php", post(handlers::sync_text))
        .route("/chat/get", post(handlers::sync_text))
        .route("/chat/post", post(handlers::post_message))
        // Versioned JSON
        .route("/api/chat/sync", get(handlers::sync_json))
        .with_state(state)
}
