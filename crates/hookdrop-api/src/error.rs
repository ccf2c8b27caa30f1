//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Handler pattern:** Return `Result<Response, HttpAppError>`. Use `AppError`
//! (or types that implement `Into<AppError>`) for errors and `?` so they become
//! `HttpAppError` and render consistently (status, body, logging).

use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hookdrop_core::{AppError, ErrorMetadata, LogLevel};
use hookdrop_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from hookdrop-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// A body that claims to be multipart but cannot be decoded as such.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::Internal(format!(
            "Multipart rejected: {}",
            rejection.body_text()
        )))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type = error_type,
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // client_message() already hides details for sensitive errors
        let body = Json(ErrorResponse {
            error: app_error.client_message(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{FromRequest, Multipart};
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_from_storage_error_is_storage() {
        let storage_err = StorageError::WriteFailed("disk full".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Storage(msg) => assert!(msg.contains("disk full")),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_anyhow_keeps_source() {
        let HttpAppError(app_err) = anyhow::anyhow!("boom").into();
        assert!(matches!(app_err, AppError::InternalWithSource { .. }));
        assert!(app_err.detailed_message().contains("boom"));
    }

    #[tokio::test]
    async fn test_validation_error_renders_400_with_message() {
        let response = HttpAppError(AppError::InvalidInput(
            "At least one file or JSON data is required.".to_string(),
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({ "error": "At least one file or JSON data is required." })
        );
    }

    #[tokio::test]
    async fn test_limit_error_renders_400_verbatim() {
        let response =
            HttpAppError(AppError::LimitExceeded("Too many files".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Too many files");
    }

    #[tokio::test]
    async fn test_storage_error_does_not_leak_details() {
        let response = HttpAppError(AppError::Storage(
            "Failed to create file /srv/uploads/x: Permission denied".to_string(),
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "error": "Unexpected server error." }));
    }

    #[tokio::test]
    async fn test_multipart_rejection_renders_generic_500() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "multipart/form-data")
            .body(axum::body::Body::empty())
            .unwrap();
        let Err(rejection) = Multipart::from_request(request, &()).await else {
            panic!("a multipart body without a boundary must be rejected");
        };

        let response = HttpAppError::from(rejection).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "error": "Unexpected server error." }));
    }
}
