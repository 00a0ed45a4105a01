//! Unified error handling for the Comanda system

pub mod codes;
pub mod http;
pub mod types;

pub use codes::{ErrorCategory, ErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
