//! Unified catalog queries — regular menu items plus special dishes
//!
//! The unified menu is a UNION of `menu_items` and `platos_especiales`,
//! each row tagged `es_especial`. The validity-window check for
//! specials happens in SQL so a special past `fecha_fin` never appears,
//! whatever its `disponible` flag says.

use shared::error::AppError;
use shared::models::{CatalogItem, Categoria, CategoriaCreate};
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Optional filters for the unified menu listing
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuFilter {
    pub categoria_id: Option<i64>,
    pub vegetariano: Option<bool>,
    pub picante: Option<bool>,
}

/// Unified menu: available regular items plus currently valid specials,
/// ordered by category name then item name
pub async fn unified_menu(pool: &PgPool, filter: MenuFilter) -> ServiceResult<Vec<CatalogItem>> {
    let items = sqlx::query_as::<_, CatalogItem>(
        r#"
        SELECT * FROM (
            SELECT mi.id, mi.nombre, mi.descripcion, mi.precio,
                   mi.categoria_id, c.nombre AS categoria_nombre,
                   mi.disponible, mi.vegetariano, mi.picante,
                   mi.imagen, mi.tiempo_preparacion,
                   FALSE AS es_especial
            FROM menu_items mi
            JOIN categorias c ON c.id = mi.categoria_id
            WHERE mi.disponible = TRUE AND c.activo = TRUE

            UNION ALL

            SELECT pe.id, pe.nombre, pe.descripcion, pe.precio,
                   pe.categoria_id, c.nombre AS categoria_nombre,
                   pe.disponible, pe.vegetariano, pe.picante,
                   pe.imagen_url AS imagen, pe.tiempo_preparacion,
                   TRUE AS es_especial
            FROM platos_especiales pe
            JOIN categorias c ON c.id = pe.categoria_id
            WHERE pe.disponible = TRUE AND pe.vigente = TRUE AND c.activo = TRUE
              AND pe.fecha_inicio <= CURRENT_DATE
              AND (pe.fecha_fin IS NULL OR pe.fecha_fin >= CURRENT_DATE)
        ) menu
        WHERE ($1::BIGINT IS NULL OR menu.categoria_id = $1)
          AND ($2::BOOLEAN IS NULL OR menu.vegetariano = $2)
          AND ($3::BOOLEAN IS NULL OR menu.picante = $3)
        ORDER BY menu.categoria_nombre, menu.nombre
        "#,
    )
    .bind(filter.categoria_id)
    .bind(filter.vegetariano)
    .bind(filter.picante)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Single catalog entry by id — specials take precedence over regular
/// items when both tables carry the id
pub async fn get_catalog_item(pool: &PgPool, id: i64) -> ServiceResult<CatalogItem> {
    let special = sqlx::query_as::<_, CatalogItem>(
        r#"
        SELECT pe.id, pe.nombre, pe.descripcion, pe.precio,
               pe.categoria_id, c.nombre AS categoria_nombre,
               pe.disponible, pe.vegetariano, pe.picante,
               pe.imagen_url AS imagen, pe.tiempo_preparacion,
               TRUE AS es_especial
        FROM platos_especiales pe
        JOIN categorias c ON c.id = pe.categoria_id
        WHERE pe.id = $1 AND pe.vigente = TRUE
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if let Some(item) = special {
        return Ok(item);
    }

    let regular = sqlx::query_as::<_, CatalogItem>(
        r#"
        SELECT mi.id, mi.nombre, mi.descripcion, mi.precio,
               mi.categoria_id, c.nombre AS categoria_nombre,
               mi.disponible, mi.vegetariano, mi.picante,
               mi.imagen, mi.tiempo_preparacion,
               FALSE AS es_especial
        FROM menu_items mi
        JOIN categorias c ON c.id = mi.categoria_id
        WHERE mi.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    regular.ok_or_else(|| AppError::new(shared::ErrorCode::ProductNotFound).into())
}

/// Active categories ordered by name
pub async fn list_categorias(pool: &PgPool) -> ServiceResult<Vec<Categoria>> {
    let categorias = sqlx::query_as::<_, Categoria>(
        "SELECT id, nombre, descripcion, activo FROM categorias WHERE activo = TRUE ORDER BY nombre",
    )
    .fetch_all(pool)
    .await?;

    Ok(categorias)
}

/// Create a category
pub async fn create_categoria(pool: &PgPool, payload: &CategoriaCreate) -> ServiceResult<Categoria> {
    let nombre = payload.nombre.trim();
    if nombre.is_empty() {
        return Err(AppError::validation("Category name is required").into());
    }

    let categoria = sqlx::query_as::<_, Categoria>(
        r#"
        INSERT INTO categorias (nombre, descripcion)
        VALUES ($1, $2)
        RETURNING id, nombre, descripcion, activo
        "#,
    )
    .bind(nombre)
    .bind(&payload.descripcion)
    .fetch_one(pool)
    .await?;

    Ok(categoria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::specials;
    use chrono::{Duration, NaiveDate, Utc};
    use shared::models::PlatoEspecialCreate;
    use shared::price::PriceInput;

    fn special(
        nombre: &str,
        fecha_inicio: NaiveDate,
        fecha_fin: Option<NaiveDate>,
    ) -> PlatoEspecialCreate {
        PlatoEspecialCreate {
            nombre: nombre.into(),
            descripcion: None,
            precio: PriceInput::Texto("22.00".into()),
            categoria_id: None,
            fecha_inicio: Some(fecha_inicio),
            fecha_fin,
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
    async fn test_expired_special_never_reaches_the_menu(pool: PgPool) {
        let today = Utc::now().date_naive();
        let expired = specials::create_special(
            &pool,
            &special("Cochinita", today - Duration::days(10), Some(today - Duration::days(2))),
        )
        .await
        .unwrap();
        let current = specials::create_special(
            &pool,
            &special("Mole", today - Duration::days(2), None),
        )
        .await
        .unwrap();

        // Still flagged available, only the window excludes it
        assert!(expired.disponible);

        let menu = unified_menu(&pool, MenuFilter::default()).await.unwrap();
        assert!(menu.iter().any(|i| i.es_especial && i.id == current.id));
        assert!(!menu.iter().any(|i| i.es_especial && i.id == expired.id));
    }

    #[sqlx::test]
    async fn test_not_yet_started_special_excluded(pool: PgPool) {
        let today = Utc::now().date_naive();
        let upcoming = specials::create_special(
            &pool,
            &special("Tamales", today + Duration::days(3), None),
        )
        .await
        .unwrap();

        let menu = unified_menu(&pool, MenuFilter::default()).await.unwrap();
        assert!(!menu.iter().any(|i| i.es_especial && i.id == upcoming.id));
    }
}
