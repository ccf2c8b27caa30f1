//! Streaming multipart receiver.
//!
//! Parts carrying a filename are written straight to the request's session
//! directory, chunk by chunk; every other part is collected as a text field.
//! File count, file size and field size limits are enforced while reading.
//! When reading fails for any reason, every file already written for the
//! request is removed before the error is returned.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use hookdrop_core::constants::{
    MIME_OCTET_STREAM, MSG_FIELD_TOO_LONG, MSG_FILE_TOO_LARGE, MSG_TOO_MANY_FILES,
};
use hookdrop_core::models::{FormFields, UploadedFile};
use hookdrop_core::{AppError, Config};
use hookdrop_storage::keys::generate_stored_name;
use hookdrop_storage::{FileSink, LocalStorage, UploadSession};

/// Ceilings applied while reading a multipart body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipartLimits {
    pub max_files: usize,
    pub max_file_size_bytes: u64,
    pub max_field_size_bytes: usize,
}

impl MultipartLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_files: config.max_files(),
            max_file_size_bytes: config.max_file_size_bytes() as u64,
            max_field_size_bytes: config.max_field_size_bytes(),
        }
    }
}

/// A file part that has been fully written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedFile {
    pub field_name: String,
    pub original_name: String,
    pub stored_name: String,
    pub mime_type: String,
    pub path: PathBuf,
    pub size: u64,
}

impl ReceivedFile {
    pub fn to_uploaded(&self, storage: &LocalStorage) -> UploadedFile {
        UploadedFile {
            field_name: self.field_name.clone(),
            original_name: self.original_name.clone(),
            stored_name: self.stored_name.clone(),
            mime_type: self.mime_type.clone(),
            size: self.size,
            path: storage.display_path(&self.path),
        }
    }
}

/// Everything read from one multipart body
#[derive(Debug, Default)]
pub struct ReceivedMultipart {
    pub fields: FormFields,
    pub files: Vec<ReceivedFile>,
}

/// Map a decoding failure from the multipart layer onto the error taxonomy.
/// Framing errors are not limit breaches; they surface as a generic 500.
pub fn multipart_error(err: MultipartError) -> AppError {
    AppError::Internal(format!(
        "Multipart decoding failed ({}): {}",
        err.status(),
        err.body_text()
    ))
}

/// Read the whole multipart body, storing files under `session`.
pub async fn receive_multipart(
    multipart: &mut Multipart,
    storage: &LocalStorage,
    session: &mut UploadSession,
    limits: &MultipartLimits,
) -> Result<ReceivedMultipart, AppError> {
    let mut received = ReceivedMultipart::default();

    match read_parts(multipart, storage, session, limits, &mut received).await {
        Ok(()) => {
            tracing::debug!(
                files = received.files.len(),
                fields = received.fields.len(),
                "Multipart body received"
            );
            Ok(received)
        }
        Err(err) => {
            discard_files(storage, &received.files).await;
            Err(err)
        }
    }
}

async fn read_parts(
    multipart: &mut Multipart,
    storage: &LocalStorage,
    session: &mut UploadSession,
    limits: &MultipartLimits,
    received: &mut ReceivedMultipart,
) -> Result<(), AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();

        let Some(original_name) = field.file_name().map(str::to_string) else {
            let value = read_text(&mut field, limits.max_field_size_bytes).await?;
            received.fields.insert(field_name, value);
            continue;
        };

        if received.files.len() >= limits.max_files {
            return Err(AppError::LimitExceeded(MSG_TOO_MANY_FILES.to_string()));
        }

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| MIME_OCTET_STREAM.to_string());
        let stored_name = generate_stored_name(&original_name);

        let dir = session.resolve(storage).await?;
        let sink = storage.create_file(dir, &stored_name).await?;
        let partial = sink.path().to_path_buf();

        let (path, size) = match stream_file(&mut field, sink, limits.max_file_size_bytes).await {
            Ok(written) => written,
            Err(err) => {
                remove_quietly(storage, &partial).await;
                return Err(err);
            }
        };

        tracing::debug!(
            field = %field_name,
            original_name = %original_name,
            stored_name = %stored_name,
            size_bytes = size,
            "File part stored"
        );

        received.files.push(ReceivedFile {
            field_name,
            original_name,
            stored_name,
            mime_type,
            path,
            size,
        });
    }

    Ok(())
}

async fn stream_file(
    field: &mut Field<'_>,
    mut sink: FileSink,
    max_bytes: u64,
) -> Result<(PathBuf, u64), AppError> {
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if sink.bytes_written() + chunk.len() as u64 > max_bytes {
            return Err(AppError::LimitExceeded(MSG_FILE_TOO_LARGE.to_string()));
        }
        sink.write_chunk(&chunk).await?;
    }
    Ok(sink.finish().await?)
}

async fn read_text(field: &mut Field<'_>, max_bytes: usize) -> Result<String, AppError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > max_bytes {
            return Err(AppError::LimitExceeded(MSG_FIELD_TOO_LONG.to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn discard_files(storage: &LocalStorage, files: &[ReceivedFile]) {
    for file in files {
        remove_quietly(storage, &file.path).await;
    }
}

async fn remove_quietly(storage: &LocalStorage, path: &Path) {
    if let Err(e) = storage.remove_file(path).await {
        tracing::warn!(error = %e, path = %path.display(), "Failed to remove rejected upload");
    }
}
