//! Database entities and request/response payloads

pub mod category;
pub mod menu_item;
pub mod mesa;
pub mod order;
pub mod special;
pub mod user;

pub use category::{Categoria, CategoriaCreate};
pub use menu_item::{CatalogItem, MenuItem};
pub use mesa::{Mesa, MesaEstado};
pub use order::{Orden, OrdenConItems, OrdenCreate, OrdenItem, OrdenItemInput, OrdenResumen};
pub use special::{PlatoEspecial, PlatoEspecialCreate, PlatoEspecialUpdate};
pub use user::{LoginRequest, LoginResponse, Usuario, UsuarioPublico};
