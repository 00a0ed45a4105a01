//! Menu item model (table `menu_items`) and the unified catalog row

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Regular menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub categoria_id: i64,
    pub disponible: bool,
    pub vegetariano: bool,
    pub picante: bool,
    pub imagen: Option<String>,
    pub ingredientes: Option<String>,
    pub tiempo_preparacion: Option<i32>,
}

/// One row of the unified catalog (`menu_items` ∪ `platos_especiales`)
///
/// Specials are flattened into the same shape and tagged `es_especial`
/// so clients render one homogeneous list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CatalogItem {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub categoria_id: i64,
    pub categoria_nombre: String,
    pub disponible: bool,
    pub vegetariano: bool,
    pub picante: bool,
    pub imagen: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub es_especial: bool,
}
