//! Shared constants
//!
//! Limits mirror what the webhook producers were built against; every limit
//! can be overridden through [`crate::Config`].

/// Maximum number of file parts accepted in one multipart request
pub const DEFAULT_MAX_FILES: usize = 50;

/// Maximum size of a single uploaded file, in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 20;

/// Maximum size of a single non-file form field value, in kilobytes
pub const DEFAULT_MAX_FIELD_SIZE_KB: usize = 1024;

/// Maximum decoded size of a pure JSON request body, in megabytes
pub const DEFAULT_MAX_JSON_BODY_MB: usize = 100;

/// Form field names that are checked first when looking for JSON metadata
pub const DEFAULT_METADATA_FIELD_NAMES: [&str; 4] = ["json", "data", "metadata", "result"];

/// Directory (relative to the working directory) that receives upload sessions
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

pub const MIME_JSON: &str = "application/json";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
pub const MIME_MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Suffix of the file written for a pure JSON request body
pub const JSON_BODY_FILE_SUFFIX: &str = "data.json";

/// Suffix of the file written for metadata discovered in a multipart request
pub const METADATA_FILE_SUFFIX: &str = "metadata.json";

pub const MSG_JSON_SAVED: &str = "JSON received and saved";
pub const MSG_FILES_RECEIVED: &str = "Files and data received successfully";
pub const MSG_NOTHING_RECEIVED: &str = "At least one file or JSON data is required.";
pub const MSG_TOO_MANY_FILES: &str = "Too many files";
pub const MSG_FILE_TOO_LARGE: &str = "File too large";
pub const MSG_FIELD_TOO_LONG: &str = "Field value too long";
pub const MSG_UNEXPECTED: &str = "Unexpected server error.";
