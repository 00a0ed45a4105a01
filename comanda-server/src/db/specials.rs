//! Special dish queries (table `platos_especiales`)
//!
//! Deletion is always soft: `vigente = FALSE` retires the row but keeps
//! it for order history. Every write filters on `vigente = TRUE`, so
//! operations on a retired special come back as not-found instead of a
//! silent no-op.

use shared::error::AppError;
use shared::models::{PlatoEspecial, PlatoEspecialCreate, PlatoEspecialUpdate};
use sqlx::PgPool;

use crate::error::ServiceResult;

const SPECIAL_COLUMNS: &str = r#"
    id, nombre, descripcion, precio, categoria_id, disponible, vigente,
    fecha_inicio, fecha_fin, imagen_url, tiempo_preparacion,
    ingredientes, alergenos, calorias, vegetariano, picante,
    created_at, updated_at
"#;

/// All current specials, newest first
pub async fn list_specials(pool: &PgPool) -> ServiceResult<Vec<PlatoEspecial>> {
    let specials = sqlx::query_as::<_, PlatoEspecial>(&format!(
        "SELECT {SPECIAL_COLUMNS} FROM platos_especiales WHERE vigente = TRUE ORDER BY created_at DESC",
    ))
    .fetch_all(pool)
    .await?;

    Ok(specials)
}

/// Specials a customer can order right now: current, available and
/// inside their validity window
pub async fn list_available_specials(pool: &PgPool) -> ServiceResult<Vec<PlatoEspecial>> {
    let specials = sqlx::query_as::<_, PlatoEspecial>(&format!(
        r#"
        SELECT {SPECIAL_COLUMNS} FROM platos_especiales
        WHERE vigente = TRUE AND disponible = TRUE
          AND fecha_inicio <= CURRENT_DATE
          AND (fecha_fin IS NULL OR fecha_fin >= CURRENT_DATE)
        ORDER BY created_at DESC
        "#,
    ))
    .fetch_all(pool)
    .await?;

    Ok(specials)
}

/// Single current special by id
pub async fn get_special(pool: &PgPool, id: i64) -> ServiceResult<PlatoEspecial> {
    let special = sqlx::query_as::<_, PlatoEspecial>(&format!(
        "SELECT {SPECIAL_COLUMNS} FROM platos_especiales WHERE id = $1 AND vigente = TRUE",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    special.ok_or_else(|| AppError::new(shared::ErrorCode::SpecialNotFound).into())
}

/// Create a special
///
/// `fecha_inicio` defaults to today; `categoria_id` defaults to the
/// seeded specials category.
pub async fn create_special(
    pool: &PgPool,
    payload: &PlatoEspecialCreate,
) -> ServiceResult<PlatoEspecial> {
    let nombre = payload.nombre.trim();
    if nombre.is_empty() {
        return Err(AppError::validation("Special name is required").into());
    }
    let precio = payload.precio.normalize()?;

    let categoria_id = match payload.categoria_id {
        Some(id) => id,
        None => default_specials_category(pool).await?,
    };

    let special = sqlx::query_as::<_, PlatoEspecial>(&format!(
        r#"
        INSERT INTO platos_especiales (
            nombre, descripcion, precio, categoria_id,
            fecha_inicio, fecha_fin, imagen_url, tiempo_preparacion,
            ingredientes, alergenos, calorias, vegetariano, picante
        )
        VALUES ($1, $2, $3, $4, COALESCE($5, CURRENT_DATE), $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {SPECIAL_COLUMNS}
        "#,
    ))
    .bind(nombre)
    .bind(&payload.descripcion)
    .bind(precio)
    .bind(categoria_id)
    .bind(payload.fecha_inicio)
    .bind(payload.fecha_fin)
    .bind(&payload.imagen_url)
    .bind(payload.tiempo_preparacion)
    .bind(&payload.ingredientes)
    .bind(&payload.alergenos)
    .bind(payload.calorias)
    .bind(payload.vegetariano)
    .bind(payload.picante)
    .fetch_one(pool)
    .await?;

    Ok(special)
}

/// Full update — absent fields keep their stored value, retired rows 404
pub async fn update_special(
    pool: &PgPool,
    id: i64,
    payload: &PlatoEspecialUpdate,
) -> ServiceResult<PlatoEspecial> {
    let precio = payload
        .precio
        .as_ref()
        .map(|p| p.normalize())
        .transpose()?;

    let special = sqlx::query_as::<_, PlatoEspecial>(&format!(
        r#"
        UPDATE platos_especiales SET
            nombre = COALESCE($2, nombre),
            descripcion = COALESCE($3, descripcion),
            precio = COALESCE($4, precio),
            categoria_id = COALESCE($5, categoria_id),
            disponible = COALESCE($6, disponible),
            fecha_inicio = COALESCE($7, fecha_inicio),
            fecha_fin = COALESCE($8, fecha_fin),
            imagen_url = COALESCE($9, imagen_url),
            tiempo_preparacion = COALESCE($10, tiempo_preparacion),
            ingredientes = COALESCE($11, ingredientes),
            alergenos = COALESCE($12, alergenos),
            calorias = COALESCE($13, calorias),
            vegetariano = COALESCE($14, vegetariano),
            picante = COALESCE($15, picante),
            updated_at = NOW()
        WHERE id = $1 AND vigente = TRUE
        RETURNING {SPECIAL_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(&payload.nombre)
    .bind(&payload.descripcion)
    .bind(precio)
    .bind(payload.categoria_id)
    .bind(payload.disponible)
    .bind(payload.fecha_inicio)
    .bind(payload.fecha_fin)
    .bind(&payload.imagen_url)
    .bind(payload.tiempo_preparacion)
    .bind(&payload.ingredientes)
    .bind(&payload.alergenos)
    .bind(payload.calorias)
    .bind(payload.vegetariano)
    .bind(payload.picante)
    .fetch_optional(pool)
    .await?;

    special.ok_or_else(|| AppError::new(shared::ErrorCode::SpecialNotFound).into())
}

/// Toggle availability without touching the rest of the row
pub async fn set_availability(
    pool: &PgPool,
    id: i64,
    disponible: bool,
) -> ServiceResult<PlatoEspecial> {
    let special = sqlx::query_as::<_, PlatoEspecial>(&format!(
        r#"
        UPDATE platos_especiales
        SET disponible = $2, updated_at = NOW()
        WHERE id = $1 AND vigente = TRUE
        RETURNING {SPECIAL_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(disponible)
    .fetch_optional(pool)
    .await?;

    special.ok_or_else(|| AppError::new(shared::ErrorCode::SpecialNotFound).into())
}

/// Soft delete: retire the special, keep the row for order history
pub async fn retire_special(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE platos_especiales
        SET vigente = FALSE, disponible = FALSE, updated_at = NOW()
        WHERE id = $1 AND vigente = TRUE
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::new(shared::ErrorCode::SpecialNotFound).into());
    }
    Ok(())
}

/// Id of the seeded specials category
async fn default_specials_category(pool: &PgPool) -> ServiceResult<i64> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM categorias WHERE nombre = 'Especiales' AND activo = TRUE")
            .fetch_optional(pool)
            .await?;

    match row {
        Some((id,)) => Ok(id),
        None => Err(AppError::with_message(
            shared::ErrorCode::CategoryNotFound,
            "Specials category is not configured",
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PlatoEspecialUpdate;
    use shared::price::PriceInput;

    fn payload(nombre: &str) -> PlatoEspecialCreate {
        PlatoEspecialCreate {
            nombre: nombre.into(),
            descripcion: None,
            precio: PriceInput::Texto("18.00".into()),
            categoria_id: None,
            fecha_inicio: None,
            fecha_fin: None,
            imagen_url: None,
            tiempo_preparacion: None,
            ingredientes: None,
            alergenos: None,
            calorias: None,
            vegetariano: false,
            picante: false,
        }
    }

    #[sqlx::test]
    async fn test_update_after_retire_returns_not_found(pool: PgPool) {
        let created = create_special(&pool, &payload("Ceviche del día")).await.unwrap();
        retire_special(&pool, created.id).await.unwrap();

        let err = update_special(
            &pool,
            created.id,
            &PlatoEspecialUpdate {
                nombre: Some("Ceviche nuevo".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::SpecialNotFound);
    }

    #[sqlx::test]
    async fn test_retired_special_leaves_listings_but_keeps_row(pool: PgPool) {
        let created = create_special(&pool, &payload("Paella")).await.unwrap();
        retire_special(&pool, created.id).await.unwrap();

        let listed = list_specials(&pool).await.unwrap();
        assert!(listed.iter().all(|s| s.id != created.id));

        let err = get_special(&pool, created.id).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::SpecialNotFound);

        // Row survives for order history
        let (vigente,): (bool,) =
            sqlx::query_as("SELECT vigente FROM platos_especiales WHERE id = $1")
                .bind(created.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert!(!vigente);

        // A second retire is a 404, not a silent no-op
        let err = retire_special(&pool, created.id).await.unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::SpecialNotFound);
    }
}
