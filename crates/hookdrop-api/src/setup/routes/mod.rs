//! Router assembly: the webhook route, probes, API docs, and the layer stack.

mod health;

use crate::constants::{DOCS_PATH, OPENAPI_PATH, WEBHOOK_PATH};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use hookdrop_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = Router::new()
        .route(WEBHOOK_PATH, post(handlers::webhook::receive_webhook))
        .merge(health::health_routes())
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path(DOCS_PATH))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes()))
        .layer(DefaultBodyLimit::disable());

    let app = match config.request_timeout_secs() {
        0 => app,
        secs => {
            tracing::info!(request_timeout_secs = secs, "Request timeout layer enabled");
            app.layer(TimeoutLayer::new(Duration::from_secs(secs)))
        }
    };

    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|origin| origin == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", origin, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookdrop_core::WebhookConfig;

    fn config_with_origins(origins: &[&str]) -> Config {
        let mut inner = WebhookConfig::default();
        inner.base.cors_origins = origins.iter().map(|s| s.to_string()).collect();
        Config(Box::new(inner))
    }

    #[test]
    fn test_cors_accepts_wildcard_and_explicit_origins() {
        assert!(setup_cors(&config_with_origins(&["*"])).is_ok());
        assert!(setup_cors(&config_with_origins(&["https://hooks.example.com"])).is_ok());
    }

    #[test]
    fn test_cors_rejects_unparsable_origin() {
        assert!(setup_cors(&config_with_origins(&["bad\norigin"])).is_err());
    }
}
