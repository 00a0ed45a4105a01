//! User queries (table `usuarios`)

use shared::models::Usuario;
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Find an active user by email (login)
pub async fn find_by_email(pool: &PgPool, email: &str) -> ServiceResult<Option<Usuario>> {
    let user = sqlx::query_as::<_, Usuario>(
        r#"
        SELECT id, nombre, email, password_hash, rol, activo, created_at
        FROM usuarios
        WHERE email = $1 AND activo = TRUE
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Find an active user by id (token verification)
pub async fn find_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<Usuario>> {
    let user = sqlx::query_as::<_, Usuario>(
        r#"
        SELECT id, nombre, email, password_hash, rol, activo, created_at
        FROM usuarios
        WHERE id = $1 AND activo = TRUE
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
