//! Request processing behind the webhook route.

pub mod metadata;
pub mod multipart;
pub mod webhook;
