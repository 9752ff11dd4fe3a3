use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;

use crate::catalog::CatalogSource;
use crate::error::{Result, SearchError};

/// Base URL of the current deployment from proxy headers.
///
/// Scheme comes from `x-forwarded-proto` (default `http`), host from
/// `x-forwarded-host`, falling back to `host`.
pub fn base_url_from_headers(
    forwarded_proto: Option<&str>,
    forwarded_host: Option<&str>,
    host: Option<&str>,
) -> String {
    let proto = forwarded_proto.filter(|p| !p.is_empty()).unwrap_or("http");
    let host = forwarded_host
        .filter(|h| !h.is_empty())
        .or(host)
        .unwrap_or("");

    format!("{}://{}", proto, host)
}

/// Catalog published as a static JSON asset, fetched over HTTP
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    path: String,
}

impl HttpCatalog {
    pub fn new(client: Client, base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            path: path.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn load_raw(&self) -> Result<Value> {
        let url = self.url();
        tracing::debug!("Fetching catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::CatalogFetch {
                path: self.path.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    fn name(&self) -> &str {
        "http"
    }
}
