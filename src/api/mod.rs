//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP endpoints for the Fleettrack backend:
//! - Auth endpoints (register/login, public)
//! - Vehicle endpoints (protected)
//! - Photo upload endpoint (protected)
//! - Static serving of uploaded photos

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod auth;
pub mod middleware;
pub mod responses;
pub mod upload;
pub mod vehicles;

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the API router: public auth routes plus the protected vehicle
/// and upload routes behind the auth gate.
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let protected_routes = vehicles::router()
        .merge(upload::router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    auth::router().merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", build_api_router(state.clone()))
        // Serve uploaded photos back to clients
        .nest_service("/uploads", ServeDir::new(&state.upload_config.path))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
