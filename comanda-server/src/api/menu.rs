//! Unified menu reads (regular items plus valid specials)

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::CatalogItem;

use crate::db::catalog::{self, MenuFilter};
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menu", get(list))
        .route("/menu/{id}", get(get_one))
}

#[derive(Debug, Deserialize)]
struct MenuQuery {
    categoria_id: Option<i64>,
    vegetariano: Option<bool>,
    picante: Option<bool>,
}

/// GET /api/menu
async fn list(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> ServiceResult<ApiResponse<Vec<CatalogItem>>> {
    let items = catalog::unified_menu(
        &state.pool,
        MenuFilter {
            categoria_id: query.categoria_id,
            vegetariano: query.vegetariano,
            picante: query.picante,
        },
    )
    .await?;

    Ok(ApiResponse::success(items))
}

/// GET /api/menu/{id}
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<CatalogItem>> {
    let item = catalog::get_catalog_item(&state.pool, id).await?;
    Ok(ApiResponse::success(item))
}
