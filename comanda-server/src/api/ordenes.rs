//! Order lifecycle endpoints

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, middleware};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError};
use shared::models::{OrdenConItems, OrdenCreate, OrdenItem, OrdenItemInput, OrdenResumen};
use shared::order::OrderStatus;

use crate::auth::require_auth;
use crate::db::orders;
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/ordenes", post(create))
        .route("/ordenes/{id}/estado", patch(update_estado))
        .route("/ordenes/{id}/items", post(add_items))
        .route(
            "/ordenes/{orden_id}/items/{item_id}/estado",
            patch(update_item_estado),
        )
        .route("/ordenes/mesa/{mesa}/cerrar", post(cerrar_mesa))
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/ordenes", get(list))
        .route("/ordenes/activas", get(list_activas))
        .route("/ordenes/{id}", get(get_one))
        .route("/ordenes/mesa/{mesa}", get(list_by_mesa))
        .merge(protected)
}

fn parse_estado(raw: &str) -> Result<OrderStatus, AppError> {
    raw.parse().map_err(|_| {
        AppError::with_message(
            shared::ErrorCode::InvalidOrderStatus,
            format!("Unknown order status: {raw}"),
        )
    })
}

#[derive(Debug, Serialize)]
struct CreatedOrder {
    #[serde(flatten)]
    orden: OrdenConItems,
    resumen: OrdenResumen,
}

/// POST /api/ordenes
async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrdenCreate>,
) -> ServiceResult<ApiResponse<CreatedOrder>> {
    let (orden, resumen) = orders::create_order(&state.pool, &payload).await?;
    Ok(ApiResponse::success(CreatedOrder { orden, resumen }))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// GET /api/ordenes
async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ServiceResult<ApiResponse<Vec<OrdenConItems>>> {
    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);
    let ordenes = orders::list_orders(&state.pool, limit, offset).await?;
    Ok(ApiResponse::success(ordenes))
}

/// GET /api/ordenes/activas
async fn list_activas(
    State(state): State<AppState>,
) -> ServiceResult<ApiResponse<Vec<OrdenConItems>>> {
    let ordenes = orders::list_active_orders(&state.pool).await?;
    Ok(ApiResponse::success(ordenes))
}

/// GET /api/ordenes/{id}
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<OrdenConItems>> {
    let orden = orders::get_order_with_items(&state.pool, id).await?;
    Ok(ApiResponse::success(orden))
}

/// GET /api/ordenes/mesa/{mesa}
async fn list_by_mesa(
    State(state): State<AppState>,
    Path(mesa): Path<String>,
) -> ServiceResult<ApiResponse<Vec<OrdenConItems>>> {
    let ordenes = orders::list_orders_by_mesa(&state.pool, &mesa).await?;
    Ok(ApiResponse::success(ordenes))
}

#[derive(Debug, Deserialize)]
struct EstadoBody {
    estado: String,
}

/// PATCH /api/ordenes/{id}/estado — cascades to open lines
async fn update_estado(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<EstadoBody>,
) -> ServiceResult<ApiResponse<OrdenConItems>> {
    let estado = parse_estado(&body.estado)?;
    let orden = orders::update_order_status(&state.pool, id, estado).await?;
    Ok(ApiResponse::success(orden))
}

/// PATCH /api/ordenes/{orden_id}/items/{item_id}/estado
async fn update_item_estado(
    State(state): State<AppState>,
    Path((orden_id, item_id)): Path<(i64, i64)>,
    Json(body): Json<EstadoBody>,
) -> ServiceResult<ApiResponse<OrdenItem>> {
    let estado = parse_estado(&body.estado)?;
    let item = orders::update_item_status(&state.pool, orden_id, item_id, estado).await?;
    Ok(ApiResponse::success(item))
}

#[derive(Debug, Deserialize)]
struct ItemsBody {
    items: Vec<OrdenItemInput>,
}

/// POST /api/ordenes/{id}/items
async fn add_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ItemsBody>,
) -> ServiceResult<ApiResponse<OrdenConItems>> {
    let orden = orders::add_items(&state.pool, id, &body.items).await?;
    Ok(ApiResponse::success(orden))
}

#[derive(Debug, Serialize)]
struct CierreMesa {
    mesa: String,
    ordenes_cerradas: u64,
}

/// POST /api/ordenes/mesa/{mesa}/cerrar
async fn cerrar_mesa(
    State(state): State<AppState>,
    Path(mesa): Path<String>,
) -> ServiceResult<ApiResponse<CierreMesa>> {
    let ordenes_cerradas = orders::close_table(&state.pool, &mesa).await?;
    Ok(ApiResponse::success(CierreMesa {
        mesa,
        ordenes_cerradas,
    }))
}
