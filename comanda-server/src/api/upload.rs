//! Image upload endpoints
//!
//! Accepts multipart form data or a base64 data URL, derives the four
//! stored resolutions and returns their URLs. The heavy image work runs
//! on the blocking pool.

use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, middleware};
use base64::Engine;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{ApiResponse, AppError};

use crate::auth::{require_admin, require_auth};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;
use crate::upload::{self, StoredImage};

pub fn router(state: AppState) -> Router<AppState> {
    // Multipart bodies are slightly larger than the image they carry
    let body_limit = state.max_image_bytes + 64 * 1024;

    let admin = Router::new()
        .route("/upload/{file_name}", delete(remove))
        .layer(middleware::from_fn(require_admin));

    let protected = Router::new()
        .route("/upload/image", post(upload_multipart))
        .route("/upload/base64", post(upload_base64))
        .merge(admin)
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/upload/info/{file_name}", get(info))
        .merge(protected)
        .layer(DefaultBodyLimit::max(body_limit))
}

async fn store_on_blocking_pool(
    state: &AppState,
    data: Vec<u8>,
    file_stem: Option<String>,
) -> ServiceResult<StoredImage> {
    let uploads_dir = state.uploads_dir.clone();
    let max_bytes = state.max_image_bytes;
    tokio::task::spawn_blocking(move || {
        upload::store_image(&uploads_dir, &data, max_bytes, file_stem.as_deref())
    })
    .await
    .map_err(|e| ServiceError::Db(e.into()))?
}

/// POST /api/upload/image (multipart field `image`)
async fn upload_multipart(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServiceResult<ApiResponse<StoredImage>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_request(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_stem = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::invalid_request(e.to_string()))?;

        let stored = store_on_blocking_pool(&state, data.to_vec(), file_stem).await?;
        return Ok(ApiResponse::success(stored));
    }

    Err(AppError::validation("Multipart field 'image' is required").into())
}

#[derive(Debug, Deserialize)]
struct Base64Body {
    image_data: String,
    file_name: Option<String>,
}

/// POST /api/upload/base64 (`{"image_data": "data:image/png;base64,..."}`)
async fn upload_base64(
    State(state): State<AppState>,
    Json(body): Json<Base64Body>,
) -> ServiceResult<ApiResponse<StoredImage>> {
    // Accept both a bare base64 payload and a data URL
    let encoded = match body.image_data.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => body.image_data.as_str(),
    };

    let data = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| {
            AppError::with_message(shared::ErrorCode::InvalidImage, "Invalid base64 payload")
        })?;

    let stored = store_on_blocking_pool(&state, data, body.file_name).await?;
    Ok(ApiResponse::success(stored))
}

/// GET /api/upload/info/{file_name}
async fn info(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> ServiceResult<ApiResponse<StoredImage>> {
    let stored = upload::image_info(&state.uploads_dir, &file_name)?;
    Ok(ApiResponse::success(stored))
}

/// DELETE /api/upload/{file_name} (admin) — removes every resolution
async fn remove(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> ServiceResult<ApiResponse<Value>> {
    let removed = upload::delete_image(&state.uploads_dir, &file_name)?;
    Ok(ApiResponse::success(
        json!({ "file_name": file_name, "resoluciones_eliminadas": removed }),
    ))
}
