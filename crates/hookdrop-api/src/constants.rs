//! HTTP-level constants.

/// Route that receives webhook deliveries.
pub const WEBHOOK_PATH: &str = "/webhook";

pub const OPENAPI_PATH: &str = "/api/openapi.json";

pub const DOCS_PATH: &str = "/docs";

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";
