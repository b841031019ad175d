//! Environment/runtime helpers
//!
//! Sanity checks to ensure the data directory exists at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding `db_path` exists, creating it if needed.
pub async fn ensure_data_dir(db_path: &Path) -> anyhow::Result<()> {
    let Some(dir) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(dir).await.is_err() {
        warn!(dir = %dir.display(), "data directory not found; creating it");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    info!(db_path = %db_path.display(), "data directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("chirpy_env_{}", uuid::Uuid::new_v4()));
        let db = root.join("nested").join("database.json");
        ensure_data_dir(&db).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_is_ok() -> anyhow::Result<()> {
        ensure_data_dir(Path::new("database.json")).await
    }
}
