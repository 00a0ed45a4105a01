//! Unified error codes for the Comanda system
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 7xxx: Table errors
//! - 8xxx: Upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Order is in a terminal state (entregada/cancelada)
    OrderClosed = 4003,
    /// Order item not found
    OrderItemNotFound = 4004,
    /// Status value outside the fixed set
    InvalidOrderStatus = 4005,

    // ==================== 6xxx: Catalog ====================
    /// Menu item not found
    ProductNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6002,
    /// Special dish not found (or retired)
    SpecialNotFound = 6003,
    /// Price is not a positive amount
    InvalidPrice = 6004,
    /// Quantity must be at least 1
    InvalidQuantity = 6005,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table status outside the fixed set
    InvalidTableStatus = 7002,

    // ==================== 8xxx: Upload ====================
    /// Uploaded content is not a decodable image
    InvalidImage = 8001,
    /// Image exceeds the configured size cap
    ImageTooLarge = 8002,
    /// No stored resolution exists for the file
    FileNotFound = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Filesystem I/O error
    IoError = 9004,
}

/// Error category for grouping and logging decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Order,
    Catalog,
    Table,
    Upload,
    System,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the category this code belongs to
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            0..=999 => ErrorCategory::General,
            1000..=1999 => ErrorCategory::Auth,
            2000..=2999 => ErrorCategory::Permission,
            4000..=4999 => ErrorCategory::Order,
            6000..=6999 => ErrorCategory::Catalog,
            7000..=7999 => ErrorCategory::Table,
            8000..=8999 => ErrorCategory::Upload,
            _ => ErrorCategory::System,
        }
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Token is invalid",
            Self::AccountDisabled => "Account is disabled",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",

            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order must contain at least one item",
            Self::OrderClosed => "Order is already closed",
            Self::OrderItemNotFound => "Order item not found",
            Self::InvalidOrderStatus => "Invalid order status",

            Self::ProductNotFound => "Menu item not found",
            Self::CategoryNotFound => "Category not found",
            Self::SpecialNotFound => "Special dish not found",
            Self::InvalidPrice => "Price must be a positive amount",
            Self::InvalidQuantity => "Quantity must be at least 1",

            Self::TableNotFound => "Table not found",
            Self::InvalidTableStatus => "Invalid table status",

            Self::InvalidImage => "File is not a valid image",
            Self::ImageTooLarge => "Image exceeds the maximum allowed size",
            Self::FileNotFound => "File not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
            Self::IoError => "I/O error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidFormat,
            7 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::AccountDisabled,

            2001 => Self::PermissionDenied,
            2002 => Self::AdminRequired,

            4001 => Self::OrderNotFound,
            4002 => Self::OrderEmpty,
            4003 => Self::OrderClosed,
            4004 => Self::OrderItemNotFound,
            4005 => Self::InvalidOrderStatus,

            6001 => Self::ProductNotFound,
            6002 => Self::CategoryNotFound,
            6003 => Self::SpecialNotFound,
            6004 => Self::InvalidPrice,
            6005 => Self::InvalidQuantity,

            7001 => Self::TableNotFound,
            7002 => Self::InvalidTableStatus,

            8001 => Self::InvalidImage,
            8002 => Self::ImageTooLarge,
            8003 => Self::FileNotFound,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,
            9004 => Self::IoError,

            other => return Err(format!("unknown error code: {other}")),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::OrderClosed,
            ErrorCode::SpecialNotFound,
            ErrorCode::InvalidPrice,
            ErrorCode::ImageTooLarge,
            ErrorCode::InternalError,
        ] {
            let n: u16 = code.into();
            assert_eq!(ErrorCode::try_from(n), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(ErrorCode::try_from(12345).is_err());
    }

    #[test]
    fn test_category() {
        assert_eq!(ErrorCode::NotFound.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::OrderClosed.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::InvalidPrice.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("6003").unwrap();
        assert_eq!(code, ErrorCode::SpecialNotFound);
    }
}
