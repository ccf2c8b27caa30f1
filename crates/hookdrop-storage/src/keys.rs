//! Server-side naming for session directories and stored files.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

/// Longest sanitized client name kept in a stored filename. The tail is kept
/// so the extension survives.
const MAX_SANITIZED_NAME_LENGTH: usize = 200;

/// Largest random component of a stored filename prefix (inclusive).
const MAX_RANDOM_COMPONENT: u32 = 1_000_000_000;

/// Replace every character outside `[a-zA-Z0-9._-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: Vec<char> = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let start = sanitized.len().saturating_sub(MAX_SANITIZED_NAME_LENGTH);
    sanitized[start..].iter().collect()
}

/// Session directory name: the UTC timestamp in ISO-8601 form with `:` and
/// `.` replaced by `-`, followed by a request-scoped suffix.
pub fn session_dir_name(at: DateTime<Utc>, suffix: &str) -> String {
    format!("{}-{}", at.format("%Y-%m-%dT%H-%M-%S-%3fZ"), suffix)
}

/// Session directory name for a request arriving now.
pub fn generate_session_dir_name() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    session_dir_name(Utc::now(), &suffix[..8])
}

/// `{epoch_ms}-{random}-{name}`; `name` must already be sanitized.
pub fn stored_file_name(epoch_ms: i64, random: u32, name: &str) -> String {
    format!("{}-{}-{}", epoch_ms, random, name)
}

/// Unique stored name for a client-supplied filename.
pub fn generate_stored_name(original_name: &str) -> String {
    let random = rand::rng().random_range(0..=MAX_RANDOM_COMPONENT);
    stored_file_name(
        Utc::now().timestamp_millis(),
        random,
        &sanitize_filename(original_name),
    )
}
