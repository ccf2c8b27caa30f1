//! Webhook delivery processing.
//!
//! Two entry points, one per request shape: a pure JSON body is saved as a
//! single document in a fresh session; a multipart body goes through
//! receiving, metadata discovery, persistence, and classification.

use axum::extract::Multipart;
use hookdrop_core::constants::{
    JSON_BODY_FILE_SUFFIX, METADATA_FILE_SUFFIX, MSG_FILES_RECEIVED, MSG_JSON_SAVED,
    MSG_NOTHING_RECEIVED,
};
use hookdrop_core::models::{
    FilesByType, JsonSavedResponse, MetadataFile, UploadSummary, UploadedFile,
    WebhookUploadResponse,
};
use hookdrop_core::{AppError, Config};
use hookdrop_storage::keys::generate_stored_name;
use hookdrop_storage::{LocalStorage, UploadSession};
use serde_json::Value as JsonValue;

use super::metadata::discover_metadata;
use super::multipart::{receive_multipart, MultipartLimits};

pub struct WebhookService {
    storage: LocalStorage,
    limits: MultipartLimits,
    metadata_field_names: Vec<String>,
}

impl WebhookService {
    pub fn new(config: &Config, storage: LocalStorage) -> Self {
        Self {
            storage,
            limits: MultipartLimits::from_config(config),
            metadata_field_names: config.metadata_field_names().to_vec(),
        }
    }

    /// Persist a pure JSON delivery in its own session directory.
    pub async fn save_json_body(&self, body: JsonValue) -> Result<JsonSavedResponse, AppError> {
        let session = self.storage.create_session().await?;
        let file = generate_stored_name(JSON_BODY_FILE_SUFFIX);
        let path = self.storage.write_json(&session, &file, &body).await?;

        let upload_dir = self.storage.display_path(&session.path);
        let path = self.storage.display_path(&path);
        tracing::info!(upload_dir = %upload_dir, file = %file, "JSON delivery saved");

        Ok(JsonSavedResponse {
            message: MSG_JSON_SAVED.to_string(),
            file,
            upload_dir,
            path,
        })
    }

    /// Receive a multipart delivery and build its summary.
    pub async fn ingest_multipart(
        &self,
        multipart: &mut Multipart,
    ) -> Result<WebhookUploadResponse, AppError> {
        let mut session = UploadSession::new();
        let received =
            receive_multipart(multipart, &self.storage, &mut session, &self.limits).await?;

        let json_data = discover_metadata(
            &self.storage,
            &received.fields,
            &received.files,
            &self.metadata_field_names,
        )
        .await;

        if received.files.is_empty() && json_data.is_none() {
            return Err(AppError::InvalidInput(MSG_NOTHING_RECEIVED.to_string()));
        }

        let metadata_file = match &json_data {
            Some(value) => Some(self.persist_metadata(&mut session, value).await?),
            None => None,
        };

        let files: Vec<UploadedFile> = received
            .files
            .iter()
            .map(|file| file.to_uploaded(&self.storage))
            .collect();
        let files_by_type = FilesByType::partition(&files);
        let summary = UploadSummary::new(&files_by_type, json_data.is_some());
        let upload_dir = session
            .dir()
            .map(|dir| self.storage.display_path(&dir.path));

        tracing::info!(
            upload_dir = upload_dir.as_deref().unwrap_or_default(),
            total_files = summary.total_files,
            obj_files = summary.obj_files,
            json_files = summary.json_files,
            other_files = summary.other_files,
            has_json_metadata = summary.has_json_metadata,
            "Multipart delivery stored"
        );

        Ok(WebhookUploadResponse {
            message: MSG_FILES_RECEIVED.to_string(),
            summary,
            files,
            files_by_type,
            form_fields: received.fields,
            json_data,
            metadata_file,
            upload_dir,
        })
    }

    async fn persist_metadata(
        &self,
        session: &mut UploadSession,
        value: &JsonValue,
    ) -> Result<MetadataFile, AppError> {
        let dir = session.resolve(&self.storage).await?;
        let filename = generate_stored_name(METADATA_FILE_SUFFIX);
        let path = self.storage.write_json(dir, &filename, value).await?;
        Ok(MetadataFile {
            filename,
            path: self.storage.display_path(&path),
        })
    }
}
