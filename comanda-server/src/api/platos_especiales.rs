//! Special dish management

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, middleware};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{PlatoEspecial, PlatoEspecialCreate, PlatoEspecialUpdate};

use crate::auth::require_auth;
use crate::db::specials;
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/platos-especiales", post(create))
        .route("/platos-especiales/{id}", put(update))
        .route(
            "/platos-especiales/{id}/disponibilidad",
            patch(set_disponibilidad),
        )
        .route("/platos-especiales/{id}", delete(retire))
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/platos-especiales", get(list))
        .route("/platos-especiales/disponibles", get(list_disponibles))
        .route("/platos-especiales/{id}", get(get_one))
        .merge(protected)
}

/// GET /api/platos-especiales
async fn list(State(state): State<AppState>) -> ServiceResult<ApiResponse<Vec<PlatoEspecial>>> {
    let especiales = specials::list_specials(&state.pool).await?;
    Ok(ApiResponse::success(especiales))
}

/// GET /api/platos-especiales/disponibles
async fn list_disponibles(
    State(state): State<AppState>,
) -> ServiceResult<ApiResponse<Vec<PlatoEspecial>>> {
    let especiales = specials::list_available_specials(&state.pool).await?;
    Ok(ApiResponse::success(especiales))
}

/// GET /api/platos-especiales/{id}
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<PlatoEspecial>> {
    let especial = specials::get_special(&state.pool, id).await?;
    Ok(ApiResponse::success(especial))
}

/// POST /api/platos-especiales
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PlatoEspecialCreate>,
) -> ServiceResult<ApiResponse<PlatoEspecial>> {
    let especial = specials::create_special(&state.pool, &payload).await?;
    Ok(ApiResponse::success(especial))
}

/// PUT /api/platos-especiales/{id} — 404 on retired rows
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PlatoEspecialUpdate>,
) -> ServiceResult<ApiResponse<PlatoEspecial>> {
    let especial = specials::update_special(&state.pool, id, &payload).await?;
    Ok(ApiResponse::success(especial))
}

#[derive(Debug, Deserialize)]
struct DisponibilidadBody {
    disponible: bool,
}

/// PATCH /api/platos-especiales/{id}/disponibilidad
async fn set_disponibilidad(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<DisponibilidadBody>,
) -> ServiceResult<ApiResponse<PlatoEspecial>> {
    let especial = specials::set_availability(&state.pool, id, body.disponible).await?;
    Ok(ApiResponse::success(especial))
}

/// DELETE /api/platos-especiales/{id} — soft delete, keeps history
async fn retire(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<()>> {
    specials::retire_special(&state.pool, id).await?;
    Ok(ApiResponse::ok())
}
