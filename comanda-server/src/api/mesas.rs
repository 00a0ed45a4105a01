//! Table listing and status changes

use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, middleware};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};
use shared::models::{Mesa, MesaEstado};

use crate::auth::require_auth;
use crate::db::tables;
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/mesas/{id}/estado", patch(update_estado))
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().route("/mesas", get(list)).merge(protected)
}

/// GET /api/mesas
async fn list(State(state): State<AppState>) -> ServiceResult<ApiResponse<Vec<Mesa>>> {
    let mesas = tables::list_mesas(&state.pool).await?;
    Ok(ApiResponse::success(mesas))
}

#[derive(Debug, Deserialize)]
struct EstadoBody {
    estado: String,
}

/// PATCH /api/mesas/{id}/estado
async fn update_estado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<EstadoBody>,
) -> ServiceResult<ApiResponse<Mesa>> {
    let estado: MesaEstado = body.estado.parse().map_err(|_| {
        AppError::with_message(
            shared::ErrorCode::InvalidTableStatus,
            format!("Unknown table status: {}", body.estado),
        )
    })?;

    let mesa = tables::update_mesa_estado(&state.pool, id, estado).await?;
    Ok(ApiResponse::success(mesa))
}
