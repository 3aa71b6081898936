//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`imagestore_core::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on store and
//! manager calls. This is the only place errors become status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: imagestore_core::Error,
}

impl AppError {
    pub fn new(inner: imagestore_core::Error) -> Self {
        Self { inner }
    }
}

impl From<imagestore_core::Error> for AppError {
    fn from(e: imagestore_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let body = json!({
            "error": self.inner.to_string(),
            "code": self.inner.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagestore_core::Error;

    #[test]
    fn not_found_produces_404() {
        let response = AppError::new(Error::not_found("document", 17)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unsupported_media_type_produces_415() {
        let response =
            AppError::new(Error::UnsupportedMediaType("text/plain".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn store_unavailable_produces_503() {
        let response = AppError::new(Error::StoreUnavailable("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn io_produces_500() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let response = AppError::from(Error::from(io)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
