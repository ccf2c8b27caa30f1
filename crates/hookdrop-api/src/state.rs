//! Application state shared by every handler.
//!
//! Nothing in here is mutated per request; the only shared mutable resource is
//! the filesystem under the uploads root.

use crate::services::webhook::WebhookService;
use hookdrop_core::Config;
use hookdrop_storage::LocalStorage;

pub struct AppState {
    pub config: Config,
    pub storage: LocalStorage,
    pub webhook: WebhookService,
}

impl AppState {
    pub fn new(config: Config, storage: LocalStorage) -> Self {
        let webhook = WebhookService::new(&config, storage.clone());
        Self {
            config,
            storage,
            webhook,
        }
    }
}
