pub mod lexical;
pub mod normalize;
pub mod synonyms;
pub mod terms;

use crate::core::{Label, Product, ScoredProduct};

pub use lexical::{score_product, LexicalRanker, ProductScore, TAG_BONUS};
pub use normalize::{normalize, tokenize};
pub use terms::expand_terms;

/// Result count used when the client sends no usable limit
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound on the result count
pub const MAX_LIMIT: usize = 50;

/// Trait for catalog ranking implementations
pub trait Ranker: Send + Sync {
    /// Score every product, drop non-matches, sort best first and keep at most `limit`
    fn rank(&self, labels: &[Label], products: &[Product], limit: usize) -> Vec<ScoredProduct>;

    /// Get ranker name for logging
    fn name(&self) -> &str;
}

/// Coerce a client-supplied limit: absent, non-finite or non-positive gives
/// [`DEFAULT_LIMIT`], anything else is truncated and clamped to `1..=MAX_LIMIT`.
pub fn clamp_limit(requested: Option<f64>) -> usize {
    match requested {
        Some(limit) if limit.is_finite() && limit > 0.0 => {
            (limit.trunc() as usize).clamp(1, MAX_LIMIT)
        }
        _ => DEFAULT_LIMIT,
    }
}
