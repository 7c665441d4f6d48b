//! Upload route: raw image body in, public URL out.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Json;
use serde::Serialize;

use crate::routes::auth::AuthUser;
use crate::services::storage::{self, StorageError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// `POST /api/uploads`: store an ad image and return where it lives.
pub async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, StatusCode> {
    let Some(store) = &state.storage else {
        return Err(storage_error_to_status(&StorageError::Unconfigured));
    };

    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let kind = storage::validate_image(content_type, &body, state.config.max_image_bytes).map_err(|e| {
        tracing::debug!(error = %e, user_id = %auth.user.id, "upload rejected");
        storage_error_to_status(&e)
    })?;

    let url = store.upload(body, kind).await.map_err(|e| {
        tracing::error!(error = %e, "image upload failed");
        storage_error_to_status(&e)
    })?;

    Ok(Json(UploadResponse { url }))
}

pub(crate) fn storage_error_to_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::Unconfigured => StatusCode::SERVICE_UNAVAILABLE,
        StorageError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        StorageError::Empty | StorageError::SignatureMismatch(_) => StatusCode::BAD_REQUEST,
        StorageError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        StorageError::Request(_) | StorageError::Response { .. } => StatusCode::BAD_GATEWAY,
        StorageError::HttpClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "uploads_test.rs"]
mod tests;
