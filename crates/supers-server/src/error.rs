//! Error types for the HTTP layer.
//!
//! [`ApiError`] is converted into a JSON error response via its
//! [`IntoResponse`] implementation. The push stream itself never fails
//! this way: read errors on the watched file are absorbed as empty
//! content below the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while handling an API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The operation is turned off by configuration.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Writing the watched file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Self::Io(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to write super file: {e}"),
            ),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_maps_to_403() {
        let response = ApiError::Forbidden(String::from("off")).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn io_maps_to_500() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
