//! Database access, grouped per resource
//!
//! Plain `pub async fn(pool, ...)` query functions. Multi-statement
//! writes run inside a transaction; business-rule checks that depend on
//! row state (terminal orders, retired specials) live inside the same
//! transaction as the write they guard.

pub mod catalog;
pub mod orders;
pub mod reports;
pub mod specials;
pub mod tables;
pub mod users;
