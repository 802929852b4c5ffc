use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};

use crate::error::ApiError;

// Any path no route claims
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound("Route not found."))
}

/// Replaces actix's plain-text 400 for unreadable JSON bodies.
pub fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected body for {} {}: {}", req.method(), req.path(), err);
    ApiError::BadRequest("Invalid JSON body.").into()
}
