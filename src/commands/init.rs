//! Init command implementation

use crate::config::Config;
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Write a default configuration and create the data layout.
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<Config> {
    let mut config = Config::default();
    let base = base_dir.unwrap_or_else(Config::default_base_dir);

    config.paths.config_file = base.join("config.toml");
    config.paths.index_dir = base.join("index");
    config.paths.base_dir = base;

    if config.paths.config_file.exists() && !force {
        return Err(Error::Config(format!(
            "Already initialized at {} (use --force to overwrite)",
            config.paths.config_file.display()
        )));
    }

    std::fs::create_dir_all(&config.paths.base_dir)?;
    std::fs::create_dir_all(&config.paths.index_dir)?;
    config.save()?;

    info!("Initialized centinela at {}", config.paths.base_dir.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_layout() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("centinela");

        let config = cmd_init(Some(base.clone()), false).await.unwrap();

        assert!(base.join("config.toml").exists());
        assert!(base.join("index").is_dir());
        assert_eq!(config.paths.index_dir, base.join("index"));
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().to_path_buf();

        cmd_init(Some(base.clone()), false).await.unwrap();
        let err = cmd_init(Some(base.clone()), false).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        cmd_init(Some(base), true).await.unwrap();
    }
}
