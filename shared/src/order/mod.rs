//! Order status state machine
//!
//! Orders and their items share one fixed status set. The lifecycle is
//! deliberately loose: while an order is open, staff can move it to any
//! member of the set (kitchens go back and forth). Terminal statuses
//! (`entregada`, `cancelada`) accept no further transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an order or an order line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pendiente,
    Confirmada,
    Preparando,
    Lista,
    Entregada,
    Cancelada,
}

impl OrderStatus {
    /// Every member of the status set, in lifecycle order
    pub const ALL: [OrderStatus; 6] = [
        Self::Pendiente,
        Self::Confirmada,
        Self::Preparando,
        Self::Lista,
        Self::Entregada,
        Self::Cancelada,
    ];

    /// Lowercase wire representation (also the DB column value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Confirmada => "confirmada",
            Self::Preparando => "preparando",
            Self::Lista => "lista",
            Self::Entregada => "entregada",
            Self::Cancelada => "cancelada",
        }
    }

    /// Terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Entregada | Self::Cancelada)
    }

    /// Whether a transition to `target` is allowed from this status
    pub fn can_transition_to(&self, _target: OrderStatus) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pendiente),
            "confirmada" => Ok(Self::Confirmada),
            "preparando" => Ok(Self::Preparando),
            "lista" => Ok(Self::Lista),
            "entregada" => Ok(Self::Entregada),
            "cancelada" => Ok(Self::Cancelada),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_lowercase_spanish() {
        let json = serde_json::to_string(&OrderStatus::Preparando).unwrap();
        assert_eq!(json, "\"preparando\"");
        let status: OrderStatus = serde_json::from_str("\"entregada\"").unwrap();
        assert_eq!(status, OrderStatus::Entregada);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Entregada.is_terminal());
        assert!(OrderStatus::Cancelada.is_terminal());
        assert!(!OrderStatus::Pendiente.is_terminal());
        assert!(!OrderStatus::Lista.is_terminal());
    }

    #[test]
    fn test_open_order_accepts_any_target() {
        // Staff can move an open order anywhere in the set, including backwards
        for target in OrderStatus::ALL {
            assert!(OrderStatus::Pendiente.can_transition_to(target));
            assert!(OrderStatus::Lista.can_transition_to(target));
        }
        assert!(OrderStatus::Preparando.can_transition_to(OrderStatus::Confirmada));
        assert!(OrderStatus::Pendiente.can_transition_to(OrderStatus::Cancelada));
    }

    #[test]
    fn test_nothing_leaves_a_terminal_status() {
        for target in OrderStatus::ALL {
            assert!(!OrderStatus::Entregada.can_transition_to(target));
            assert!(!OrderStatus::Cancelada.can_transition_to(target));
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("pagada".parse::<OrderStatus>().is_err());
        assert!("Pendiente".parse::<OrderStatus>().is_err());
    }
}
