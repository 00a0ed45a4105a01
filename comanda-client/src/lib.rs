//! Comanda Client — staff-device library for the Comanda API
//!
//! Holds the per-table cart state (sent vs. not-yet-sent lines), keeps
//! it persisted as JSON on the device, and talks to comanda-server.

pub mod api;
pub mod cart;
pub mod error;
pub mod storage;

pub use api::ApiService;
pub use cart::{CartBook, CartLine, TableCart};
pub use error::{CartError, ClientError, ClientResult};
pub use storage::CartStorage;
