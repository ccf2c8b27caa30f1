//! Multipart parts and on-disk assertions shared by the webhook tests.

use axum_test::multipart::Part;
use serde_json::Value;
use std::path::Path;

/// A binary mesh file of `size` bytes.
pub fn obj_part(file_name: &str, size: usize) -> Part {
    Part::bytes(bytes::Bytes::from(vec![b'v'; size]))
        .file_name(file_name.to_string())
        .mime_type("application/octet-stream")
}

/// A JSON document uploaded as a file.
pub fn json_file_part(file_name: &str, value: &Value) -> Part {
    Part::bytes(bytes::Bytes::from(value.to_string()))
        .file_name(file_name.to_string())
        .mime_type("application/json")
}

/// A plain text file.
pub fn text_file_part(file_name: &str, content: &str) -> Part {
    Part::bytes(bytes::Bytes::from(content.to_string()))
        .file_name(file_name.to_string())
        .mime_type("text/plain")
}

/// Parse a JSON file referenced by a response path.
pub fn read_json(path: &str) -> Value {
    let content = std::fs::read_to_string(path).expect("referenced file exists");
    serde_json::from_str(&content).expect("referenced file is JSON")
}

/// Every listed file exists and has the reported size.
pub fn assert_files_on_disk(files: &Value) {
    for file in files.as_array().expect("files is an array") {
        let path = file["path"].as_str().expect("path is a string");
        assert!(Path::new(path).is_relative(), "{} must be relative", path);
        let metadata = std::fs::metadata(path).expect("listed file exists on disk");
        assert_eq!(Some(metadata.len()), file["size"].as_u64(), "size of {}", path);
    }
}
