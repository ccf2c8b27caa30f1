//! Media type helpers shared by request routing and file classification.

use crate::constants::{MIME_JSON, MIME_MULTIPART_FORM_DATA, MIME_OCTET_STREAM};

/// Normalize a MIME type by stripping parameters and lowercasing
/// (e.g. "Application/JSON; charset=utf-8" -> "application/json").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

pub fn is_json_mime(content_type: &str) -> bool {
    normalize_mime_type(content_type) == MIME_JSON
}

pub fn is_octet_stream(content_type: &str) -> bool {
    normalize_mime_type(content_type) == MIME_OCTET_STREAM
}

pub fn is_multipart_form_data(content_type: &str) -> bool {
    normalize_mime_type(content_type) == MIME_MULTIPART_FORM_DATA
}

/// Case-insensitive filename suffix check; `extension` excludes the dot.
pub fn has_extension(filename: &str, extension: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.len() > extension.len()
        && lower.ends_with(&extension.to_lowercase())
        && lower.as_bytes()[lower.len() - extension.len() - 1] == b'.'
}

/// A file is JSON-ish when its declared type is JSON or its name ends in `.json`.
pub fn looks_like_json_file(filename: &str, content_type: &str) -> bool {
    is_json_mime(content_type) || has_extension(filename, "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_parameters() {
        assert_eq!(
            normalize_mime_type("Application/JSON; charset=utf-8"),
            "application/json"
        );
        assert_eq!(
            normalize_mime_type("multipart/form-data; boundary=abc"),
            "multipart/form-data"
        );
    }

    #[test]
    fn test_has_extension_is_case_insensitive() {
        assert!(has_extension("mesh.OBJ", "obj"));
        assert!(has_extension("result.json", "json"));
        assert!(!has_extension("json", "json"));
        assert!(!has_extension("notjson", "json"));
        assert!(!has_extension("archive.json.gz", "json"));
    }

    #[test]
    fn test_looks_like_json_file() {
        assert!(looks_like_json_file("payload.bin", "application/json"));
        assert!(looks_like_json_file("payload.JSON", "text/plain"));
        assert!(!looks_like_json_file("payload.txt", "text/plain"));
    }
}
