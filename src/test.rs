//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::{TestApi, TestApiState};
use crate::{Config, SyncPolicy};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

/// Test environment that sets up a budget home directory with a Config whose
/// server URL addresses a private in-memory test server. Holds TempDir to
/// keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a Config and a freshly seeded
    /// in-memory server.
    ///
    /// The server URL carries a random hostname so that each environment gets
    /// its own server state, even when tests run concurrently.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("budget");

        let rand = Uuid::new_v4().to_string().replace('-', "");
        let server_url = format!("http://{rand}.test.invalid");
        let config = Config::create(&root, &server_url).await.unwrap();

        // First attachment seeds the in-memory server for this URL
        let _ = TestApi::attach(config.server_url());

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Creates a test environment whose config file carries `policy` as its
    /// `sync_policy` setting.
    pub async fn with_sync_policy(policy: SyncPolicy) -> Self {
        let mut env = Self::new().await;

        // Rewrite config.json with the policy and reload through Config
        let path = env.config.config_path().to_path_buf();
        let mut json: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        json["sync_policy"] = serde_json::json!(policy);
        tokio::fs::write(&path, serde_json::to_string_pretty(&json).unwrap())
            .await
            .unwrap();

        let root = env.config.root().to_path_buf();
        env.config = Config::load(&root).await.unwrap();
        env
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A handle to the in-memory server state behind this environment's URL,
    /// for seeding and inspection.
    pub fn server_state(&self) -> Arc<Mutex<TestApiState>> {
        TestApi::attach(self.config.server_url()).state()
    }
}
