//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use hookdrop_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hookdrop API",
        version = "0.1.0",
        description = "Webhook receiver that stores JSON deliveries and multipart uploads in per-request directories"
    ),
    paths(handlers::webhook::receive_webhook),
    components(
        schemas(
            models::UploadedFile,
            models::FileCategory,
            models::FilesByType,
            models::UploadSummary,
            models::MetadataFile,
            models::WebhookUploadResponse,
            models::JsonSavedResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "webhook", description = "Webhook deliveries")
    )
)]
pub struct ApiDoc;
