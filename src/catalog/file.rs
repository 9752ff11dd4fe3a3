use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::catalog::CatalogSource;
use crate::error::Result;

/// Catalog stored as a JSON file on local disk
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load_raw(&self) -> Result<Value> {
        let bytes = tokio::fs::read(&self.path).await?;
        let payload = serde_json::from_slice(&bytes)?;

        tracing::debug!("Loaded catalog from {} ({} bytes)", self.path.display(), bytes.len());

        Ok(payload)
    }

    fn name(&self) -> &str {
        "file"
    }
}
