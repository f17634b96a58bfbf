use axum::{body::Bytes, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct PhotoData {
    received_bytes: usize,
    stored: bool,
    message: &'static str,
}

/// Accepts a captured photo and discards it.
pub(super) async fn capture_photo(
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<PhotoData>>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "photo body is empty"));
    }

    tracing::info!(bytes = body.len(), "photo captured and discarded");
    Ok(Json(ApiResponse {
        data: PhotoData {
            received_bytes: body.len(),
            stored: false,
            message: "Photo taken! In a real application it would be sent to report the lost pet.",
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
