//! Login and token verification

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use shared::error::{ApiResponse, AppError};
use shared::models::{LoginRequest, LoginResponse, UsuarioPublico};

use crate::auth::{CurrentUser, require_auth};
use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/verify", get(verify))
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/auth/login", post(login))
        .merge(protected)
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same response, so the
/// endpoint never confirms which emails exist.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ServiceResult<ApiResponse<LoginResponse>> {
    let Some(user) = db::users::find_by_email(&state.pool, payload.email.trim()).await? else {
        return Err(AppError::invalid_credentials().into());
    };

    let hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ServiceError::Db(format!("corrupt password hash: {e}").into()))?;
    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &hash)
        .is_err()
    {
        tracing::warn!(email = %user.email, "Failed login attempt");
        return Err(AppError::invalid_credentials().into());
    }

    let token = state
        .jwt
        .generate_token(&user)
        .map_err(|e| ServiceError::Db(e.into()))?;

    tracing::info!(user_id = user.id, email = %user.email, "User logged in");

    Ok(ApiResponse::success(LoginResponse {
        token,
        usuario: user.into(),
    }))
}

/// GET /api/auth/verify — fresh user row for the token's subject
async fn verify(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ServiceResult<ApiResponse<UsuarioPublico>> {
    let Some(user) = db::users::find_by_id(&state.pool, current.id).await? else {
        return Err(AppError::not_found("User").into());
    };

    Ok(ApiResponse::success(user.into()))
}
