//! Data models for the webhook receiver
//!
//! Request-side form data and the response payloads returned by `POST /webhook`.

mod form;
mod upload;

pub use form::*;
pub use upload::*;
