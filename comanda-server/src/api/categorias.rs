//! Category listing and creation

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, middleware};
use shared::error::ApiResponse;
use shared::models::{Categoria, CategoriaCreate};

use crate::auth::{require_admin, require_auth};
use crate::db::catalog;
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/categorias", post(create))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/categorias", get(list))
        .merge(admin)
}

/// GET /api/categorias
async fn list(State(state): State<AppState>) -> ServiceResult<ApiResponse<Vec<Categoria>>> {
    let categorias = catalog::list_categorias(&state.pool).await?;
    Ok(ApiResponse::success(categorias))
}

/// POST /api/categorias (admin)
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoriaCreate>,
) -> ServiceResult<ApiResponse<Categoria>> {
    let categoria = catalog::create_categoria(&state.pool, &payload).await?;
    Ok(ApiResponse::success(categoria))
}
