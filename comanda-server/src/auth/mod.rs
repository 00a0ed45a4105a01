//! Authentication: JWT service and axum middleware

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
