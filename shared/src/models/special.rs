//! Special dish model (table `platos_especiales`)
//!
//! Specials are never row-deleted: historical order lines keep pointing
//! at them. Retirement is the soft flag `vigente = false`.

use crate::price::PriceInput;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Special dish entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PlatoEspecial {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub categoria_id: i64,
    pub disponible: bool,
    /// Soft-delete flag: retired specials stay in the table for history
    pub vigente: bool,
    pub fecha_inicio: NaiveDate,
    /// Open-ended validity when None
    pub fecha_fin: Option<NaiveDate>,
    pub imagen_url: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub ingredientes: Option<String>,
    pub alergenos: Option<String>,
    pub calorias: Option<i32>,
    pub vegetariano: bool,
    pub picante: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload — `nombre` and a positive `precio` are mandatory,
/// `fecha_inicio` defaults to today, `categoria_id` to the specials
/// category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatoEspecialCreate {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: PriceInput,
    pub categoria_id: Option<i64>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub imagen_url: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub ingredientes: Option<String>,
    pub alergenos: Option<String>,
    pub calorias: Option<i32>,
    #[serde(default)]
    pub vegetariano: bool,
    #[serde(default)]
    pub picante: bool,
}

/// Full-update payload — absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatoEspecialUpdate {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<PriceInput>,
    pub categoria_id: Option<i64>,
    pub disponible: Option<bool>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub imagen_url: Option<String>,
    pub tiempo_preparacion: Option<i32>,
    pub ingredientes: Option<String>,
    pub alergenos: Option<String>,
    pub calorias: Option<i32>,
    pub vegetariano: Option<bool>,
    pub picante: Option<bool>,
}
