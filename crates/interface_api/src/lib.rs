//! HTTP API Layer
//!
//! This crate provides the REST API adjusters use to review claims, built on
//! Axum.
//!
//! # Architecture
//!
//! - **Context**: Composition root holding the loaded artifacts and adapters
//! - **Handlers**: Claim lookup and search, liability decisions, fraud
//!   assessment, the document assistant, and health
//! - **Middleware**: Authentication, authorization, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, context::AppContext};
//!
//! let context = Arc::new(AppContext::initialize(&config, repository)?);
//! let app = create_router(context, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use crate::config::ApiConfig;
use crate::context::AppContext;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{assessment, assistant, claims, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<AppContext>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `context` - Loaded artifacts and adapters
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(context: Arc<AppContext>, config: ApiConfig) -> Router {
    let state = AppState { context, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/search", get(claims::search_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/assessment", get(assessment::assess_claim))
        .route("/:id/liability", put(claims::update_liability));

    // Assistant routes
    let assistant_routes = Router::new()
        .route("/ask", post(assistant::ask));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/assistant", assistant_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
