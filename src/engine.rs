use crate::catalog::CatalogSource;
use crate::core::{Label, SearchResponse};
use crate::error::{Result, SearchError};
use crate::providers::LabelProvider;
use crate::ranking::{clamp_limit, LexicalRanker, Ranker};
use std::sync::Arc;
use std::time::Instant;

/// Image search orchestrator: labels from the provider, ranking over the catalog
pub struct SearchEngine {
    catalog: Arc<dyn CatalogSource>,
    provider: Arc<dyn LabelProvider>,
    ranker: Arc<dyn Ranker>,
}

/// Search query parameters
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Data URL or bare base64 image
    pub image: String,
    /// Requested result count, coerced by [`clamp_limit`]
    pub limit: Option<f64>,
}

impl SearchQuery {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Base64 payload of a data URL (text after the first comma) or the input as-is
pub fn image_payload(image: &str) -> &str {
    match image.split_once(',') {
        Some((_, payload)) => payload,
        None => image,
    }
}

impl SearchEngine {
    /// Create engine with the default lexical ranker
    pub fn new(catalog: Arc<dyn CatalogSource>, provider: Arc<dyn LabelProvider>) -> Self {
        Self::with_ranker(catalog, provider, Arc::new(LexicalRanker::new()))
    }

    pub fn with_ranker(
        catalog: Arc<dyn CatalogSource>,
        provider: Arc<dyn LabelProvider>,
        ranker: Arc<dyn Ranker>,
    ) -> Self {
        Self {
            catalog,
            provider,
            ranker,
        }
    }

    /// Label the image and rank the catalog against the labels
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResponse> {
        let start = Instant::now();

        if query.image.is_empty() {
            return Err(SearchError::MissingImage);
        }
        self.provider.check_configured()?;

        let products = self.catalog.load().await?;
        let labels = self
            .provider
            .detect_labels(image_payload(&query.image))
            .await?;

        let response = self.rank_products(labels, &products, query.limit);

        tracing::info!(
            "{} labels, {} products → {} matches via {}/{} ({:.1}ms)",
            response.labels.len(),
            products.len(),
            response.count,
            self.provider.name(),
            self.ranker.name(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(response)
    }

    /// Rank the catalog against labels supplied by the caller
    pub async fn rank_labels(&self, labels: Vec<Label>, limit: Option<f64>) -> Result<SearchResponse> {
        let products = self.catalog.load().await?;
        Ok(self.rank_products(labels, &products, limit))
    }

    fn rank_products(
        &self,
        labels: Vec<Label>,
        products: &[crate::core::Product],
        limit: Option<f64>,
    ) -> SearchResponse {
        let ranked = self.ranker.rank(&labels, products, clamp_limit(limit));
        SearchResponse::new(labels, ranked)
    }
}
