//! Test helpers: build AppState and router for integration tests.
//!
//! Each test app gets its own uploads root inside a temporary directory created
//! under the crate directory, so response paths (relative to the working
//! directory) can be opened directly.

pub mod fixtures;

use axum_test::TestServer;
use hookdrop_api::setup::routes;
use hookdrop_api::state::AppState;
use hookdrop_core::{Config, WebhookConfig};
use hookdrop_storage::LocalStorage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the uploads root it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub uploads_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Session directories created so far.
    pub fn session_dirs(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.uploads_dir)
            .expect("uploads dir exists")
            .map(|entry| entry.expect("readable entry").path())
            .collect()
    }

    /// Regular files anywhere under the uploads root.
    pub fn stored_file_count(&self) -> usize {
        count_files(&self.uploads_dir)
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("readable dir")
        .map(|entry| {
            let path = entry.expect("readable entry").path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}

/// Setup test app with default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, adjusting the configuration before the router is built.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut WebhookConfig)) -> TestApp {
    let cwd = std::env::current_dir().expect("working directory");
    let temp_dir = tempfile::Builder::new()
        .prefix("hookdrop-test-")
        .tempdir_in(cwd)
        .expect("Failed to create temp dir");

    let mut inner = WebhookConfig {
        uploads_dir: temp_dir.path().join("uploads"),
        ..WebhookConfig::default()
    };
    customize(&mut inner);
    let config = Config(Box::new(inner));

    let storage = LocalStorage::new(config.uploads_dir())
        .await
        .expect("Failed to create local storage");
    let uploads_dir = storage.root().to_path_buf();
    let state = Arc::new(AppState::new(config.clone(), storage));
    let app = routes::setup_routes(&config, state).expect("Failed to build router");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        uploads_dir,
        _temp_dir: temp_dir,
    }
}
