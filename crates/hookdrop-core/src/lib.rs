//! Hookdrop Core Library
//!
//! This crate provides the configuration, error types, and response models
//! shared by the storage layer and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod log_format;
pub mod mime;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, WebhookConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use log_format::LogFormat;
