//! API routes for comanda-server
//!
//! Each resource contributes its own sub-router; this module is the
//! single composition root. Reads are public, mutations carry the auth
//! middleware inside their resource router.

pub mod auth;
pub mod categorias;
pub mod health;
pub mod menu;
pub mod mesas;
pub mod ordenes;
pub mod platos_especiales;
pub mod reportes;
pub mod upload;

use axum::Router;
use axum::routing::get;
use http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        .merge(auth::router(state.clone()))
        .merge(menu::router())
        .merge(categorias::router(state.clone()))
        .merge(mesas::router(state.clone()))
        .merge(ordenes::router(state.clone()))
        .merge(platos_especiales::router(state.clone()))
        .merge(reportes::router(state.clone()))
        .merge(upload::router(state.clone()));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy from the configured origin list ("*" allows any origin)
fn cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if origins.trim() == "*" {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<http::HeaderValue> = origins
            .split(',')
            .filter_map(|o| o.trim().parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}
