//! Hookdrop API Library
//!
//! This crate provides the HTTP surface of the webhook receiver: the router,
//! the `POST /webhook` handler, multipart receiving, metadata discovery, and
//! application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
