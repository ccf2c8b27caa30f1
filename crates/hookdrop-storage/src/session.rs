//! Per-request upload session.
//!
//! A request owns at most one session directory. It is created the first time
//! something needs to be written and reused for everything after that.

use crate::error::StorageResult;
use crate::local::{LocalStorage, SessionDir};

#[derive(Debug, Default)]
pub struct UploadSession {
    dir: Option<SessionDir>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session directory, creating it on first use.
    pub async fn resolve(&mut self, storage: &LocalStorage) -> StorageResult<&SessionDir> {
        let dir = match self.dir.take() {
            Some(dir) => dir,
            None => storage.create_session().await?,
        };
        Ok(self.dir.insert(dir))
    }

    /// The session directory, if one was created.
    pub fn dir(&self) -> Option<&SessionDir> {
        self.dir.as_ref()
    }

    pub fn is_created(&self) -> bool {
        self.dir.is_some()
    }
}
