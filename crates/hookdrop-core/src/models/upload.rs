use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use super::form::FormFields;
use crate::mime::{has_extension, is_json_mime, is_octet_stream};

/// One file received in a multipart request and written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Multipart field name the file was sent under
    pub field_name: String,
    /// Client-supplied filename, untrusted
    pub original_name: String,
    /// Sanitized, uniquified name actually written to disk
    pub stored_name: String,
    /// Client-declared content type, untrusted
    pub mime_type: String,
    /// Bytes written
    pub size: u64,
    /// Location on disk, relative to the working directory
    pub path: String,
}

/// Coarse grouping of uploaded files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Obj,
    Json,
    Other,
}

impl FileCategory {
    /// Exclusive classification: `.obj` or a generic binary type wins, then
    /// `.json` or a JSON type, everything else is `Other`.
    pub fn classify(original_name: &str, mime_type: &str) -> Self {
        if has_extension(original_name, "obj") || is_octet_stream(mime_type) {
            FileCategory::Obj
        } else if has_extension(original_name, "json") || is_json_mime(mime_type) {
            FileCategory::Json
        } else {
            FileCategory::Other
        }
    }

    pub fn of(file: &UploadedFile) -> Self {
        Self::classify(&file.original_name, &file.mime_type)
    }
}

/// Uploaded files partitioned by [`FileCategory`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilesByType {
    pub obj: Vec<UploadedFile>,
    pub json: Vec<UploadedFile>,
    pub other: Vec<UploadedFile>,
}

impl FilesByType {
    pub fn partition(files: &[UploadedFile]) -> Self {
        let mut groups = FilesByType::default();
        for file in files {
            match FileCategory::of(file) {
                FileCategory::Obj => groups.obj.push(file.clone()),
                FileCategory::Json => groups.json.push(file.clone()),
                FileCategory::Other => groups.other.push(file.clone()),
            }
        }
        groups
    }

    pub fn total(&self) -> usize {
        self.obj.len() + self.json.len() + self.other.len()
    }
}

/// Counts reported for a multipart request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub total_files: usize,
    pub obj_files: usize,
    pub json_files: usize,
    pub other_files: usize,
    pub has_json_metadata: bool,
}

impl UploadSummary {
    pub fn new(groups: &FilesByType, has_json_metadata: bool) -> Self {
        Self {
            total_files: groups.total(),
            obj_files: groups.obj.len(),
            json_files: groups.json.len(),
            other_files: groups.other.len(),
            has_json_metadata,
        }
    }
}

/// Persisted copy of the JSON metadata discovered in a multipart request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetadataFile {
    pub filename: String,
    pub path: String,
}

/// Response for a multipart webhook delivery
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookUploadResponse {
    pub message: String,
    pub summary: UploadSummary,
    pub files: Vec<UploadedFile>,
    pub files_by_type: FilesByType,
    #[schema(value_type = Object)]
    pub form_fields: FormFields,
    #[schema(value_type = Option<Object>)]
    pub json_data: Option<JsonValue>,
    pub metadata_file: Option<MetadataFile>,
    pub upload_dir: Option<String>,
}

/// Response for a pure JSON webhook delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsonSavedResponse {
    pub message: String,
    /// Generated filename of the saved body
    pub file: String,
    pub upload_dir: String,
    pub path: String,
}
