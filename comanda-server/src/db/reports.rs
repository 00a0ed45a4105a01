//! Report queries — sales dashboard and best sellers
//!
//! Revenue only counts delivered orders; cancelled orders appear in the
//! order count but never in the money columns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Dashboard aggregate for a date range
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub total_ordenes: i64,
    /// Sum of `total` over delivered orders in the range
    pub ingresos: Decimal,
    /// Average delivered-order total in the range
    pub ticket_promedio: Decimal,
    pub producto_top: Option<ProductoPopular>,
    /// Pending orders right now (range-independent)
    pub ordenes_pendientes: i64,
    /// Open order lines right now (range-independent)
    pub items_activos: i64,
}

/// One row of the best-sellers ranking
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductoPopular {
    pub menu_item_id: i64,
    pub es_especial: bool,
    pub nombre: String,
    pub unidades: i64,
    pub ingresos: Decimal,
}

/// Sales dashboard for `[desde, hasta]` (inclusive dates)
pub async fn dashboard(pool: &PgPool, desde: NaiveDate, hasta: NaiveDate) -> ServiceResult<Dashboard> {
    let (total_ordenes, ingresos, ticket_promedio): (i64, Decimal, Decimal) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COALESCE(SUM(total) FILTER (WHERE estado = 'entregada'), 0),
               COALESCE(AVG(total) FILTER (WHERE estado = 'entregada'), 0)
        FROM ordenes
        WHERE fecha_creacion::date BETWEEN $1 AND $2
        "#,
    )
    .bind(desde)
    .bind(hasta)
    .fetch_one(pool)
    .await?;

    let producto_top = populares(pool, desde, hasta, 1).await?.into_iter().next();

    let (ordenes_pendientes,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM ordenes WHERE estado = 'pendiente'")
            .fetch_one(pool)
            .await?;

    let (items_activos,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orden_items WHERE estado NOT IN ('entregada', 'cancelada')",
    )
    .fetch_one(pool)
    .await?;

    Ok(Dashboard {
        fecha_inicio: desde,
        fecha_fin: hasta,
        total_ordenes,
        ingresos,
        ticket_promedio: ticket_promedio.round_dp(2),
        producto_top,
        ordenes_pendientes,
        items_activos,
    })
}

/// Best-selling products by units, delivered orders only
pub async fn populares(
    pool: &PgPool,
    desde: NaiveDate,
    hasta: NaiveDate,
    limit: i64,
) -> ServiceResult<Vec<ProductoPopular>> {
    let rows = sqlx::query_as::<_, ProductoPopular>(
        r#"
        SELECT oi.menu_item_id,
               oi.es_especial,
               COALESCE(mi.nombre, pe.nombre, 'Desconocido') AS nombre,
               SUM(oi.cantidad)::BIGINT AS unidades,
               SUM(oi.cantidad * oi.precio_unitario) AS ingresos
        FROM orden_items oi
        JOIN ordenes o ON o.id = oi.orden_id
        LEFT JOIN menu_items mi
               ON NOT oi.es_especial AND mi.id = oi.menu_item_id
        LEFT JOIN platos_especiales pe
               ON oi.es_especial AND pe.id = oi.menu_item_id
        WHERE o.estado = 'entregada'
          AND o.fecha_creacion::date BETWEEN $1 AND $2
        GROUP BY oi.menu_item_id, oi.es_especial, mi.nombre, pe.nombre
        ORDER BY unidades DESC, ingresos DESC
        LIMIT $3
        "#,
    )
    .bind(desde)
    .bind(hasta)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
