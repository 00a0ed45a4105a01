//! Table model (table `mesas`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table entity
///
/// `estado` is stored as its wire string; parse with [`MesaEstado`]
/// when the fixed set matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Mesa {
    pub id: i64,
    pub nombre: String,
    pub estado: String,
    pub activa: bool,
}

/// Table status set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MesaEstado {
    Disponible,
    Ocupada,
    FueraServicio,
}

impl MesaEstado {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disponible => "disponible",
            Self::Ocupada => "ocupada",
            Self::FueraServicio => "fuera_servicio",
        }
    }
}

impl fmt::Display for MesaEstado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MesaEstado {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disponible" => Ok(Self::Disponible),
            "ocupada" => Ok(Self::Ocupada),
            "fuera_servicio" => Ok(Self::FueraServicio),
            other => Err(format!("unknown table status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_roundtrip() {
        for estado in [
            MesaEstado::Disponible,
            MesaEstado::Ocupada,
            MesaEstado::FueraServicio,
        ] {
            assert_eq!(estado.as_str().parse::<MesaEstado>(), Ok(estado));
        }
        assert!("reservada".parse::<MesaEstado>().is_err());
    }

    #[test]
    fn test_estado_wire_format() {
        let json = serde_json::to_string(&MesaEstado::FueraServicio).unwrap();
        assert_eq!(json, "\"fuera_servicio\"");
    }
}
