//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod fixture;

use parking_lot::Mutex;
use qna_client::app::App;
use qna_client::config::{ApiConfig, Config};
use qna_client::store::Store;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub use fixture::{FixtureService, ACCESS_TOKEN};

/// Build an `App` around a fresh fixture service.
///
/// Returns `(app, fixture)` so tests can inspect recorded calls.
pub fn make_app() -> (App, Arc<FixtureService>) {
    let fixture = Arc::new(FixtureService::new());
    let app = App::new(fixture.clone());
    (app, fixture)
}

/// Config pointing at `base_url` with short timeouts.
pub fn test_config(base_url: &str) -> Config {
    Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
            connect_timeout_seconds: 2,
            top_questions_size: 20,
        },
    }
}

/// Create a temporary config file with the given contents.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Count publishes on a store.
pub fn publish_counter<S: Store>(store: &S) -> Arc<Mutex<usize>> {
    let count = Arc::new(Mutex::new(0));
    let counter = count.clone();
    store.subscribe(move || *counter.lock() += 1);
    count
}
