use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use hookdrop_core::constants::MSG_NOTHING_RECEIVED;
use hookdrop_core::mime::{is_json_mime, is_multipart_form_data};
use hookdrop_core::models::{JsonSavedResponse, WebhookUploadResponse};
use hookdrop_core::AppError;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::sync::Arc;

/// How a delivery is handled, decided from its declared content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryKind {
    Json,
    Multipart,
    Unsupported,
}

fn classify(request: &Request) -> DeliveryKind {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if is_json_mime(content_type) {
        DeliveryKind::Json
    } else if is_multipart_form_data(content_type) {
        DeliveryKind::Multipart
    } else {
        DeliveryKind::Unsupported
    }
}

fn is_length_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.is::<LengthLimitError>() {
            return true;
        }
        current = err.source();
    }
    false
}

/// Collect and parse a JSON body no larger than `limit` bytes. An empty body
/// counts as an empty object. Oversized and malformed bodies are not client
/// validation errors and surface as a generic 500.
async fn read_json_body(body: Body, limit: usize) -> Result<JsonValue, AppError> {
    let bytes = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|e| {
            if is_length_limit(e.as_ref()) {
                AppError::Internal(format!("JSON body exceeds {} bytes", limit))
            } else {
                AppError::Internal(format!("Failed to read request body: {}", e))
            }
        })?
        .to_bytes();

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonValue::Object(Default::default()));
    }

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Internal(format!("Invalid JSON body: {}", e)))
}

/// Receive a webhook delivery
///
/// Accepts either a JSON document (`application/json`) or a multipart form
/// with any mix of files and text fields. Everything received is written to a
/// fresh per-request directory under the uploads root.
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "webhook",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Files and form fields; `application/json` bodies are accepted as well"),
    responses(
        (status = 200, description = "Delivery stored; JSON bodies answer with JsonSavedResponse", body = WebhookUploadResponse),
        (status = 400, description = "Nothing usable received, or a multipart limit was exceeded", body = ErrorResponse),
        (status = 500, description = "Unexpected server error, including malformed or oversized bodies", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, HttpAppError> {
    match classify(&request) {
        DeliveryKind::Json => {
            let body = read_json_body(request.into_body(), state.config.max_json_body_bytes())
                .await?;
            let response: JsonSavedResponse = state.webhook.save_json_body(body).await?;
            Ok(Json(response).into_response())
        }
        DeliveryKind::Multipart => {
            let mut multipart = Multipart::from_request(request, &()).await?;
            let response: WebhookUploadResponse =
                state.webhook.ingest_multipart(&mut multipart).await?;
            Ok(Json(response).into_response())
        }
        DeliveryKind::Unsupported => {
            tracing::debug!("Delivery is neither JSON nor multipart");
            Err(AppError::InvalidInput(MSG_NOTHING_RECEIVED.to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookdrop_core::ErrorMetadata;

    fn request_with(content_type: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder()
            .method("POST")
            .uri("/webhook");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_classify_by_normalized_content_type() {
        assert_eq!(
            classify(&request_with(Some("application/json"))),
            DeliveryKind::Json
        );
        assert_eq!(
            classify(&request_with(Some("Application/JSON; charset=utf-8"))),
            DeliveryKind::Json
        );
        assert_eq!(
            classify(&request_with(Some("multipart/form-data; boundary=x"))),
            DeliveryKind::Multipart
        );
        assert_eq!(
            classify(&request_with(Some("text/plain"))),
            DeliveryKind::Unsupported
        );
        assert_eq!(
            classify(&request_with(Some("application/vnd.api+json"))),
            DeliveryKind::Unsupported
        );
        assert_eq!(classify(&request_with(None)), DeliveryKind::Unsupported);
    }

    #[tokio::test]
    async fn test_read_json_body_parses_any_shape() {
        let value = read_json_body(Body::from("[1, \"two\", null]"), 1024)
            .await
            .unwrap();
        assert_eq!(value, serde_json::json!([1, "two", null]));
    }

    #[tokio::test]
    async fn test_read_json_body_empty_is_object() {
        let value = read_json_body(Body::empty(), 1024).await.unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_read_json_body_rejects_malformed() {
        let err = read_json_body(Body::from("{\"a\":"), 1024).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(ref msg) if msg.starts_with("Invalid JSON body")));
        assert_eq!(err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_read_json_body_enforces_limit() {
        let err = read_json_body(Body::from(format!("\"{}\"", "x".repeat(64))), 16)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(ref msg) if msg == "JSON body exceeds 16 bytes"));
    }
}
