pub mod file;
pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::Product;
use crate::error::{Result, SearchError};

pub use file::FileCatalog;
pub use http::{base_url_from_headers, HttpCatalog};

/// Trait for product catalog sources. Sources are re-read on every call.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Catalog payload as stored, unmodified
    async fn load_raw(&self) -> Result<Value>;

    /// Catalog parsed into products
    async fn load(&self) -> Result<Vec<Product>> {
        parse_products(self.load_raw().await?)
    }

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Accepts a top-level product array or an object with an `items` array
pub fn parse_products(payload: Value) -> Result<Vec<Product>> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(SearchError::InvalidCatalog(
                    "expected a product array or an `items` array".to_string(),
                ))
            }
        },
        other => {
            return Err(SearchError::InvalidCatalog(format!(
                "expected a product array, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(SearchError::from))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
