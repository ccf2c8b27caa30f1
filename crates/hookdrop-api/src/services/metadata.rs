//! JSON metadata discovery for multipart deliveries.
//!
//! Form fields are scanned first: reserved names (`json`, `data`, `metadata`,
//! `result` by default) in field order, then any field whose value looks like a
//! JSON object or array. Uploaded JSON files are scanned afterwards and the
//! last one that parses replaces whatever the fields supplied. Malformed JSON is
//! logged and skipped, never an error. A JSON `null` is never adopted.

use hookdrop_core::mime::looks_like_json_file;
use hookdrop_core::models::{FieldValue, FormFields};
use hookdrop_storage::LocalStorage;
use serde_json::Value as JsonValue;

use super::multipart::ReceivedFile;

fn parse_json(text: &str) -> Result<Option<JsonValue>, serde_json::Error> {
    let value: JsonValue = serde_json::from_str(text)?;
    Ok((!value.is_null()).then_some(value))
}

fn parse_field(name: &str, text: &str) -> Option<JsonValue> {
    match parse_json(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(field = %name, error = %e, "Form field is not valid JSON, skipping");
            None
        }
    }
}

fn values(value: &FieldValue) -> Vec<&str> {
    match value {
        FieldValue::Single(s) => vec![s.as_str()],
        FieldValue::Multiple(values) => values.iter().map(String::as_str).collect(),
    }
}

/// JSON metadata carried by form fields, if any.
pub fn metadata_from_fields(fields: &FormFields, reserved_names: &[String]) -> Option<JsonValue> {
    for (name, value) in fields.iter() {
        if !reserved_names.iter().any(|reserved| reserved == name) {
            continue;
        }
        for text in values(value) {
            if let Some(parsed) = parse_field(name, text) {
                tracing::info!(field = %name, "JSON metadata found in reserved form field");
                return Some(parsed);
            }
        }
    }

    // Fallback: any single-valued field that looks like an object or array.
    for (name, value) in fields.iter() {
        let Some(text) = value.as_str() else {
            continue;
        };
        if !(text.starts_with('{') || text.starts_with('[')) {
            continue;
        }
        if let Some(parsed) = parse_field(name, text) {
            tracing::info!(field = %name, "JSON metadata found in form field");
            return Some(parsed);
        }
    }

    None
}

/// JSON metadata carried by uploaded files; the last file that parses wins.
pub async fn metadata_from_files(
    storage: &LocalStorage,
    files: &[ReceivedFile],
) -> Option<JsonValue> {
    let mut found = None;

    for file in files {
        if !looks_like_json_file(&file.original_name, &file.mime_type) {
            continue;
        }

        let content = match storage.read_to_string(&file.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = %file.original_name, error = %e, "Could not read JSON file");
                continue;
            }
        };

        match parse_json(&content) {
            Ok(Some(value)) => {
                tracing::info!(file = %file.original_name, "JSON metadata found in uploaded file");
                found = Some(value);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    file = %file.original_name,
                    error = %e,
                    "Uploaded JSON file does not parse, skipping"
                );
            }
        }
    }

    found
}

/// Metadata for a whole delivery: uploaded files override form fields.
pub async fn discover_metadata(
    storage: &LocalStorage,
    fields: &FormFields,
    files: &[ReceivedFile],
    reserved_names: &[String],
) -> Option<JsonValue> {
    let from_fields = metadata_from_fields(fields, reserved_names);

    match metadata_from_files(storage, files).await {
        Some(from_file) => {
            if from_fields.is_some() {
                tracing::info!("Uploaded JSON file replaces form field metadata");
            }
            Some(from_file)
        }
        None => from_fields,
    }
}
