//! Order queries (tables `ordenes` and `orden_items`)
//!
//! Every multi-row write is one transaction: order creation, status
//! cascade, item append and table close either land completely or not
//! at all.

use rust_decimal::Decimal;
use shared::error::AppError;
use shared::models::{Orden, OrdenConItems, OrdenCreate, OrdenItem, OrdenItemInput, OrdenResumen};
use shared::order::OrderStatus;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::ServiceResult;

const ORDER_COLUMNS: &str =
    "id, mesa, estado, total, notas, cliente, fecha_creacion, fecha_actualizacion";
const ITEM_COLUMNS: &str = "id, orden_id, menu_item_id, es_especial, cantidad, precio_unitario, estado";

/// Validated order line: quantity checked, price normalized
#[derive(Debug)]
struct ValidatedLine {
    menu_item_id: i64,
    es_especial: bool,
    cantidad: i32,
    precio_unitario: Decimal,
}

fn validate_lines(items: &[OrdenItemInput]) -> ServiceResult<Vec<ValidatedLine>> {
    if items.is_empty() {
        return Err(AppError::new(shared::ErrorCode::OrderEmpty).into());
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        if item.cantidad < 1 {
            return Err(AppError::with_message(
                shared::ErrorCode::InvalidQuantity,
                format!("Quantity must be at least 1, got {}", item.cantidad),
            )
            .into());
        }
        lines.push(ValidatedLine {
            menu_item_id: item.menu_item_id,
            es_especial: item.es_especial,
            cantidad: item.cantidad,
            precio_unitario: item.precio.normalize()?,
        });
    }
    Ok(lines)
}

fn lines_total(lines: &[ValidatedLine]) -> Decimal {
    lines
        .iter()
        .map(|l| l.precio_unitario * Decimal::from(l.cantidad))
        .sum()
}

async fn insert_lines(
    tx: &mut Transaction<'_, Postgres>,
    orden_id: i64,
    lines: &[ValidatedLine],
) -> ServiceResult<Vec<OrdenItem>> {
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = sqlx::query_as::<_, OrdenItem>(&format!(
            r#"
            INSERT INTO orden_items (orden_id, menu_item_id, es_especial, cantidad, precio_unitario)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(orden_id)
        .bind(line.menu_item_id)
        .bind(line.es_especial)
        .bind(line.cantidad)
        .bind(line.precio_unitario)
        .fetch_one(&mut **tx)
        .await?;
        items.push(item);
    }
    Ok(items)
}

/// Create an order with its lines in one transaction
///
/// The total is always recomputed server-side; a disagreeing
/// client-supplied total is logged and ignored.
pub async fn create_order(
    pool: &PgPool,
    payload: &OrdenCreate,
) -> ServiceResult<(OrdenConItems, OrdenResumen)> {
    let mesa = payload.mesa.trim();
    if mesa.is_empty() {
        return Err(AppError::validation("Table name is required").into());
    }

    let lines = validate_lines(&payload.items)?;
    let total = lines_total(&lines);

    if let Some(client_total) = payload.total.as_ref().and_then(|t| t.normalize().ok())
        && client_total != total
    {
        tracing::debug!(
            client_total = %client_total,
            computed_total = %total,
            "Ignoring client-supplied total"
        );
    }

    let mut tx = pool.begin().await?;

    let orden = sqlx::query_as::<_, Orden>(&format!(
        r#"
        INSERT INTO ordenes (mesa, total, notas, cliente)
        VALUES ($1, $2, $3, $4)
        RETURNING {ORDER_COLUMNS}
        "#,
    ))
    .bind(mesa)
    .bind(total)
    .bind(&payload.notas)
    .bind(&payload.cliente)
    .fetch_one(&mut *tx)
    .await?;

    let items = insert_lines(&mut tx, orden.id, &lines).await?;

    tx.commit().await?;

    tracing::info!(order_id = orden.id, mesa = %orden.mesa, total = %orden.total, "Order created");

    let resumen = OrdenResumen {
        numero_orden: orden.id,
        mesa: orden.mesa.clone(),
        total: orden.total,
        cantidad_items: items.iter().map(|i| i.cantidad as i64).sum(),
    };

    Ok((OrdenConItems { orden, items }, resumen))
}

/// Fetch one order with its lines
pub async fn get_order_with_items(pool: &PgPool, id: i64) -> ServiceResult<OrdenConItems> {
    let orden = sqlx::query_as::<_, Orden>(&format!(
        "SELECT {ORDER_COLUMNS} FROM ordenes WHERE id = $1",
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::new(shared::ErrorCode::OrderNotFound))?;

    let items = sqlx::query_as::<_, OrdenItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM orden_items WHERE orden_id = $1 ORDER BY id",
    ))
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(OrdenConItems { orden, items })
}

/// Attach item lists to a page of orders with one extra query
async fn attach_items(pool: &PgPool, ordenes: Vec<Orden>) -> ServiceResult<Vec<OrdenConItems>> {
    let ids: Vec<i64> = ordenes.iter().map(|o| o.id).collect();
    let all_items = sqlx::query_as::<_, OrdenItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM orden_items WHERE orden_id = ANY($1) ORDER BY id",
    ))
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut result: Vec<OrdenConItems> = ordenes
        .into_iter()
        .map(|orden| OrdenConItems {
            orden,
            items: Vec::new(),
        })
        .collect();
    for item in all_items {
        if let Some(entry) = result.iter_mut().find(|o| o.orden.id == item.orden_id) {
            entry.items.push(item);
        }
    }
    Ok(result)
}

/// Paginated order history, newest first
pub async fn list_orders(pool: &PgPool, limit: i64, offset: i64) -> ServiceResult<Vec<OrdenConItems>> {
    let ordenes = sqlx::query_as::<_, Orden>(&format!(
        "SELECT {ORDER_COLUMNS} FROM ordenes ORDER BY fecha_creacion DESC LIMIT $1 OFFSET $2",
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    attach_items(pool, ordenes).await
}

/// Orders still in the kitchen (non-terminal), oldest first
pub async fn list_active_orders(pool: &PgPool) -> ServiceResult<Vec<OrdenConItems>> {
    let ordenes = sqlx::query_as::<_, Orden>(&format!(
        r#"
        SELECT {ORDER_COLUMNS} FROM ordenes
        WHERE estado NOT IN ('entregada', 'cancelada')
        ORDER BY fecha_creacion
        "#,
    ))
    .fetch_all(pool)
    .await?;

    attach_items(pool, ordenes).await
}

/// All orders of one table, newest first
pub async fn list_orders_by_mesa(pool: &PgPool, mesa: &str) -> ServiceResult<Vec<OrdenConItems>> {
    let ordenes = sqlx::query_as::<_, Orden>(&format!(
        "SELECT {ORDER_COLUMNS} FROM ordenes WHERE mesa = $1 ORDER BY fecha_creacion DESC",
    ))
    .bind(mesa)
    .fetch_all(pool)
    .await?;

    attach_items(pool, ordenes).await
}

/// Move an order to `target` and cascade to its open lines, atomically
///
/// Terminal lines keep their status; a terminal order rejects the
/// transition outright.
pub async fn update_order_status(
    pool: &PgPool,
    id: i64,
    target: OrderStatus,
) -> ServiceResult<OrdenConItems> {
    let mut tx = pool.begin().await?;

    let current: Option<(String,)> =
        sqlx::query_as("SELECT estado FROM ordenes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some((estado,)) = current else {
        return Err(AppError::new(shared::ErrorCode::OrderNotFound).into());
    };
    let estado: OrderStatus = estado
        .parse()
        .map_err(|e: String| AppError::internal(e))?;
    if !estado.can_transition_to(target) {
        return Err(AppError::with_message(
            shared::ErrorCode::OrderClosed,
            format!("Order {id} is already {estado}"),
        )
        .into());
    }

    sqlx::query("UPDATE ordenes SET estado = $2, fecha_actualizacion = NOW() WHERE id = $1")
        .bind(id)
        .bind(target.as_str())
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        UPDATE orden_items SET estado = $2
        WHERE orden_id = $1 AND estado NOT IN ('entregada', 'cancelada')
        "#,
    )
    .bind(id)
    .bind(target.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(order_id = id, estado = %target, "Order status updated");

    get_order_with_items(pool, id).await
}

/// Move a single line to `target`, independent of the order status
pub async fn update_item_status(
    pool: &PgPool,
    orden_id: i64,
    item_id: i64,
    target: OrderStatus,
) -> ServiceResult<OrdenItem> {
    let item = sqlx::query_as::<_, OrdenItem>(&format!(
        r#"
        UPDATE orden_items SET estado = $3
        WHERE id = $2 AND orden_id = $1
          AND estado NOT IN ('entregada', 'cancelada')
        RETURNING {ITEM_COLUMNS}
        "#,
    ))
    .bind(orden_id)
    .bind(item_id)
    .bind(target.as_str())
    .fetch_optional(pool)
    .await?;

    match item {
        Some(item) => Ok(item),
        None => {
            // Distinguish a missing line from a closed one
            let exists: Option<(String,)> =
                sqlx::query_as("SELECT estado FROM orden_items WHERE id = $1 AND orden_id = $2")
                    .bind(item_id)
                    .bind(orden_id)
                    .fetch_optional(pool)
                    .await?;
            match exists {
                Some((estado,)) => Err(AppError::with_message(
                    shared::ErrorCode::OrderClosed,
                    format!("Item {item_id} is already {estado}"),
                )
                .into()),
                None => Err(AppError::new(shared::ErrorCode::OrderItemNotFound).into()),
            }
        }
    }
}

/// Append lines to an open order and bump its total, atomically
///
/// Existing lines keep their status; the new lines start `pendiente`.
pub async fn add_items(
    pool: &PgPool,
    orden_id: i64,
    items: &[OrdenItemInput],
) -> ServiceResult<OrdenConItems> {
    let lines = validate_lines(items)?;
    let delta = lines_total(&lines);

    let mut tx = pool.begin().await?;

    let current: Option<(String,)> =
        sqlx::query_as("SELECT estado FROM ordenes WHERE id = $1 FOR UPDATE")
            .bind(orden_id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some((estado,)) = current else {
        return Err(AppError::new(shared::ErrorCode::OrderNotFound).into());
    };
    let estado: OrderStatus = estado
        .parse()
        .map_err(|e: String| AppError::internal(e))?;
    if estado.is_terminal() {
        return Err(AppError::with_message(
            shared::ErrorCode::OrderClosed,
            format!("Cannot add items to a {estado} order"),
        )
        .into());
    }

    insert_lines(&mut tx, orden_id, &lines).await?;

    sqlx::query(
        "UPDATE ordenes SET total = total + $2, fecha_actualizacion = NOW() WHERE id = $1",
    )
    .bind(orden_id)
    .bind(delta)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(order_id = orden_id, delta = %delta, "Items added to order");

    get_order_with_items(pool, orden_id).await
}

/// Close a table: mark every open order of the mesa `entregada`
/// (cascading to open lines) and release the table, in one transaction
///
/// Returns the number of orders closed.
pub async fn close_table(pool: &PgPool, mesa: &str) -> ServiceResult<u64> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE orden_items SET estado = 'entregada'
        WHERE estado NOT IN ('entregada', 'cancelada')
          AND orden_id IN (
              SELECT id FROM ordenes
              WHERE mesa = $1 AND estado NOT IN ('entregada', 'cancelada')
          )
        "#,
    )
    .bind(mesa)
    .execute(&mut *tx)
    .await?;

    let closed = sqlx::query(
        r#"
        UPDATE ordenes SET estado = 'entregada', fecha_actualizacion = NOW()
        WHERE mesa = $1 AND estado NOT IN ('entregada', 'cancelada')
        "#,
    )
    .bind(mesa)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query("UPDATE mesas SET estado = 'disponible' WHERE nombre = $1")
        .bind(mesa)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(mesa = %mesa, closed, "Table closed");

    Ok(closed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::price::PriceInput;

    fn line(menu_item_id: i64, cantidad: i32, precio: &str) -> OrdenItemInput {
        OrdenItemInput {
            menu_item_id,
            cantidad,
            precio: PriceInput::Texto(precio.into()),
            es_especial: false,
        }
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let lines = validate_lines(&[line(1, 2, "10.00"), line(2, 1, "5.50")]).unwrap();
        assert_eq!(lines_total(&lines), "25.50".parse().unwrap());
    }

    #[test]
    fn test_empty_order_rejected() {
        let err = validate_lines(&[]).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = validate_lines(&[line(1, 0, "10.00")]).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::InvalidQuantity);
    }

    #[test]
    fn test_bad_price_rejected() {
        let err = validate_lines(&[line(1, 1, "gratis")]).unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::InvalidPrice);
    }

    fn orden(items: Vec<OrdenItemInput>) -> OrdenCreate {
        OrdenCreate {
            mesa: "Mesa 1".into(),
            items,
            notas: None,
            cliente: None,
            total: None,
        }
    }

    #[sqlx::test]
    async fn test_status_cascade_skips_terminal_items(pool: PgPool) {
        let (creada, _) = create_order(&pool, &orden(vec![line(1, 1, "10.00"), line(2, 2, "5.50")]))
            .await
            .unwrap();
        let cancelled_id = creada.items[0].id;
        update_item_status(&pool, creada.orden.id, cancelled_id, OrderStatus::Cancelada)
            .await
            .unwrap();

        let updated = update_order_status(&pool, creada.orden.id, OrderStatus::Preparando)
            .await
            .unwrap();

        assert_eq!(updated.orden.estado, "preparando");
        for item in &updated.items {
            if item.id == cancelled_id {
                assert_eq!(item.estado, "cancelada");
            } else {
                assert_eq!(item.estado, "preparando");
            }
        }
    }

    #[sqlx::test]
    async fn test_terminal_order_rejects_transition(pool: PgPool) {
        let (creada, _) = create_order(&pool, &orden(vec![line(1, 1, "10.00")]))
            .await
            .unwrap();
        update_order_status(&pool, creada.orden.id, OrderStatus::Entregada)
            .await
            .unwrap();

        let err = update_order_status(&pool, creada.orden.id, OrderStatus::Preparando)
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, shared::ErrorCode::OrderClosed);
    }

    #[sqlx::test]
    async fn test_total_recomputed_ignoring_client_value(pool: PgPool) {
        let mut payload = orden(vec![line(1, 2, "10.00"), line(2, 1, "5.50")]);
        payload.total = Some(PriceInput::Texto("999.99".into()));

        let (creada, resumen) = create_order(&pool, &payload).await.unwrap();
        assert_eq!(creada.orden.total, "25.50".parse().unwrap());
        assert_eq!(resumen.total, "25.50".parse().unwrap());
        assert_eq!(resumen.cantidad_items, 3);
    }
}
