//! Order models (tables `ordenes` and `orden_items`)

use crate::price::PriceInput;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order entity
///
/// `estado` is stored as its wire string; parse with
/// [`crate::order::OrderStatus`] when the state machine matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Orden {
    pub id: i64,
    /// Table name, stored denormalized so orders survive table renames
    pub mesa: String,
    pub estado: String,
    pub total: Decimal,
    pub notas: Option<String>,
    pub cliente: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

/// Order line entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrdenItem {
    pub id: i64,
    pub orden_id: i64,
    /// Catalog id; interpreted against `platos_especiales` when
    /// `es_especial` is set, against `menu_items` otherwise
    pub menu_item_id: i64,
    pub es_especial: bool,
    pub cantidad: i32,
    /// Price snapshot taken at ordering time
    pub precio_unitario: Decimal,
    pub estado: String,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdenConItems {
    #[serde(flatten)]
    pub orden: Orden,
    pub items: Vec<OrdenItem>,
}

/// One requested order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdenItemInput {
    pub menu_item_id: i64,
    pub cantidad: i32,
    pub precio: PriceInput,
    #[serde(default)]
    pub es_especial: bool,
}

/// Create order payload
///
/// A client-supplied `total` is accepted for wire compatibility but the
/// server always recomputes the authoritative amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdenCreate {
    pub mesa: String,
    pub items: Vec<OrdenItemInput>,
    pub notas: Option<String>,
    pub cliente: Option<String>,
    pub total: Option<PriceInput>,
}

/// Summary block returned alongside a freshly created order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdenResumen {
    pub numero_orden: i64,
    pub mesa: String,
    pub total: Decimal,
    pub cantidad_items: i64,
}
