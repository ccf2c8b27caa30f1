//! Hookdrop Storage Library
//!
//! Local filesystem storage for webhook deliveries.
//!
//! # Layout
//!
//! Every request that stores anything gets its own session directory under the
//! uploads root:
//!
//! - **Session directory**: `{root}/{ISO timestamp with ':' and '.' as '-'}-{8 hex}`
//! - **Files**: `{session}/{epoch ms}-{random 0..=1e9}-{sanitized name}`
//!
//! Directory names are always server-generated; client filenames only ever
//! appear sanitized and behind the unique prefix. Naming lives in the `keys`
//! module so every writer stays consistent.

pub mod error;
pub mod keys;
pub mod local;
pub mod paths;
pub mod session;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use local::{FileSink, LocalStorage, SessionDir};
pub use session::UploadSession;
