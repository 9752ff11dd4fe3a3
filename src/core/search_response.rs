use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Label, ScoredProduct};

/// Body of a successful image search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Always `true` on success
    pub ok: bool,

    /// Labels exactly as the labeling service returned them
    pub labels: Vec<Label>,

    /// Number of products returned
    pub count: usize,

    /// Matching products, best first
    pub products: Vec<ScoredProduct>,
}

impl SearchResponse {
    pub fn new(labels: Vec<Label>, products: Vec<ScoredProduct>) -> Self {
        Self {
            ok: true,
            labels,
            count: products.len(),
            products,
        }
    }
}

/// Body of the catalog passthrough endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub ok: bool,
    pub count: usize,

    /// Catalog payload, unmodified
    pub products: Value,
}

impl CatalogResponse {
    pub fn new(products: Value) -> Self {
        Self {
            ok: true,
            count: count_products(&products),
            products,
        }
    }
}

/// Array length, else length of an `items` array, else 0
pub fn count_products(payload: &Value) -> usize {
    match payload {
        Value::Array(items) => items.len(),
        Value::Object(map) => map
            .get("items")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
        _ => 0,
    }
}
