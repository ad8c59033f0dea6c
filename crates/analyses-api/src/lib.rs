//! analyses-api - REST API layer for the analyses service
//!
//! This crate provides the HTTP routes that list and delete vehicle-listing
//! analyses through an `AnalysisStore`. It is store-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use analyses_api::{create_router, AppState};
//! use analyses_store::{RestStore, RestStoreConfig};
//!
//! let store = RestStore::new(RestStoreConfig::new(url, key))?;
//! let state = AppState::new(Arc::new(store));
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod state;
pub mod testing;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{delete, get};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::analyses;

/// Create the analyses REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        .route(
            "/api/analyses/list",
            get(analyses::list_analyses).layer(CatchPanicLayer::custom(analyses::list_panicked)),
        )
        .route(
            "/api/analyses/delete/{id}",
            delete(analyses::delete_analysis)
                .layer(CatchPanicLayer::custom(analyses::delete_panicked)),
        )
        // Missing id segment
        .route(
            "/api/analyses/delete",
            delete(analyses::delete_analysis_without_id),
        )
        .route(
            "/api/analyses/delete/",
            delete(analyses::delete_analysis_without_id),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
