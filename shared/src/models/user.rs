//! User model (table `usuarios`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity
///
/// `password_hash` never leaves the server: it is skipped on
/// serialization and only used for argon2 verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub rol: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

/// Public projection of a user (login/verify responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioPublico {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub rol: String,
}

impl From<Usuario> for UsuarioPublico {
    fn from(u: Usuario) -> Self {
        Self {
            id: u.id,
            nombre: u.nombre,
            email: u.email,
            rol: u.rol,
        }
    }
}

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: UsuarioPublico,
}
