use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` file pointing at
/// `server_url`.
///
/// # Arguments
/// - `budget_home` - The directory that will be the root of the data
///   directory, e.g. `$HOME/budget`
/// - `server_url` - The base URL of the budget server, e.g.
///   `http://localhost:4000`
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operations fail.
pub async fn init(budget_home: &Path, server_url: &str) -> Result<Out<()>> {
    let _config = Config::create(budget_home, server_url)
        .await
        .context("Unable to create the data directory and config")?;
    Ok("Successfully created the budget directory and config".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_config() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget");
        init(&home, "http://localhost:4000").await.unwrap();
        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.server_url(), "http://localhost:4000");
    }
}
