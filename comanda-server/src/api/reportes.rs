//! Sales reports (auth-gated)

use axum::Router;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::middleware;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use shared::error::ApiResponse;

use crate::auth::require_auth;
use crate::db::reports::{self, Dashboard, ProductoPopular};
use crate::error::ServiceResult;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/reportes/dashboard", get(dashboard))
        .route("/reportes/populares", get(populares))
        .layer(middleware::from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    fecha_inicio: Option<NaiveDate>,
    fecha_fin: Option<NaiveDate>,
    limit: Option<i64>,
}

impl RangeQuery {
    /// Default range is today
    fn range(&self) -> (NaiveDate, NaiveDate) {
        let today = Local::now().date_naive();
        (
            self.fecha_inicio.unwrap_or(today),
            self.fecha_fin.unwrap_or(today),
        )
    }
}

/// GET /api/reportes/dashboard
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ServiceResult<ApiResponse<Dashboard>> {
    let (desde, hasta) = query.range();
    let report = reports::dashboard(&state.pool, desde, hasta).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/reportes/populares
async fn populares(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ServiceResult<ApiResponse<Vec<ProductoPopular>>> {
    let (desde, hasta) = query.range();
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let ranking = reports::populares(&state.pool, desde, hasta, limit).await?;
    Ok(ApiResponse::success(ranking))
}
