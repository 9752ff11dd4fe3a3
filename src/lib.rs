//! # Vision Product Search
//!
//! Finds catalog products that look like an uploaded image:
//! - Label detection through an image-labeling service (Google Cloud Vision)
//! - Text normalization, English → Russian synonym expansion
//! - Word/phrase matching with confidence-weighted scoring and a tag bonus
//! - Catalog from a local JSON file or a static HTTP asset, re-read per request
//! - Interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vision_product_search::{
//!     catalog::FileCatalog, config::VisionConfig, providers::VisionProvider, SearchEngine,
//!     SearchQuery,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = VisionProvider::new(reqwest::Client::new(), VisionConfig::from_env());
//!     let engine = SearchEngine::new(
//!         Arc::new(FileCatalog::new("public/products.json")),
//!         Arc::new(provider),
//!     );
//!
//!     let response = engine.search(SearchQuery::new("data:image/jpeg;base64,...")).await?;
//!
//!     for product in &response.products {
//!         println!("{} - {:.2}", product.product.title, product.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod providers;
pub mod ranking;

#[cfg(feature = "server")]
pub mod server;

// Re-export primary types
pub use crate::core::{CatalogResponse, Label, MatchedLabel, Product, ScoredProduct, SearchResponse};
pub use catalog::CatalogSource;
pub use engine::{SearchEngine, SearchQuery};
pub use error::{Result, SearchError};
pub use ranking::{LexicalRanker, Ranker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
