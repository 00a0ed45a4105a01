//! Shared domain types for the Comanda system
//!
//! Used by both `comanda-server` and `comanda-client`:
//! - `error`: unified error codes with HTTP mapping
//! - `models`: database entities and request/response payloads
//! - `order`: order status state machine
//! - `price`: price input normalization

pub mod error;
pub mod models;
pub mod order;
pub mod price;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use order::OrderStatus;
