//! Table queries (table `mesas`)

use shared::error::AppError;
use shared::models::{Mesa, MesaEstado};
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Active tables in seating order
pub async fn list_mesas(pool: &PgPool) -> ServiceResult<Vec<Mesa>> {
    let mesas = sqlx::query_as::<_, Mesa>(
        "SELECT id, nombre, estado, activa FROM mesas WHERE activa = TRUE ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(mesas)
}

/// Set a table's status
pub async fn update_mesa_estado(pool: &PgPool, id: i64, estado: MesaEstado) -> ServiceResult<Mesa> {
    let mesa = sqlx::query_as::<_, Mesa>(
        r#"
        UPDATE mesas SET estado = $2
        WHERE id = $1 AND activa = TRUE
        RETURNING id, nombre, estado, activa
        "#,
    )
    .bind(id)
    .bind(estado.as_str())
    .fetch_optional(pool)
    .await?;

    mesa.ok_or_else(|| AppError::new(shared::ErrorCode::TableNotFound).into())
}
