//! Ad routes: list, purchase, and admin delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use grid::ad::Ad;
use grid::cell::CellId;
use serde::Serialize;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::ads::{self, AdError, PurchaseRequest};
use crate::state::AppState;

/// Error body returned for every failed ad request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    /// Plots that blocked the purchase, for overlap errors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plots: Vec<CellId>,
}

/// `GET /api/ads`: current ad list.
pub async fn list_ads(State(state): State<AppState>) -> Json<Vec<Ad>> {
    Json(ads::list_ads(&state).await)
}

/// `POST /api/ads`: book a rectangle of plots for the caller.
pub async fn create_ad(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<Ad>), Response> {
    let purchase = ads::validate_purchase(&body).map_err(ad_error_response)?;
    let ad = ads::create_ad(&state, &auth.user, purchase)
        .await
        .map_err(ad_error_response)?;
    Ok((StatusCode::CREATED, Json(ad)))
}

/// `DELETE /api/ads/{id}`: remove an ad. Administrators only.
pub async fn delete_ad(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ad_id): Path<Uuid>,
) -> Result<StatusCode, Response> {
    ads::delete_ad(&state, &auth.user, ad_id)
        .await
        .map_err(ad_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn ad_error_to_status(err: &AdError) -> StatusCode {
    match err {
        AdError::Invalid(_) => StatusCode::BAD_REQUEST,
        AdError::NotRectangular => StatusCode::UNPROCESSABLE_ENTITY,
        AdError::Overlap(_) => StatusCode::CONFLICT,
        AdError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        AdError::NotFound(_) => StatusCode::NOT_FOUND,
        AdError::Forbidden => StatusCode::FORBIDDEN,
        AdError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn ad_error_response(err: AdError) -> Response {
    let status = ad_error_to_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "ad request failed");
    } else {
        tracing::debug!(error = %err, "ad request rejected");
    }

    let message = if status.is_server_error() { "internal error".to_owned() } else { err.to_string() };
    let body = ErrorBody {
        code: err.error_code(),
        message,
        plots: match err {
            AdError::Overlap(plots) => plots,
            _ => Vec::new(),
        },
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
#[path = "ads_test.rs"]
mod tests;
