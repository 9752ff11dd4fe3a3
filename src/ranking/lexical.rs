use std::collections::{BTreeSet, HashSet};

use crate::core::{Label, MatchedLabel, Product, ScoredProduct};
use crate::ranking::normalize::{normalize, tokenize};
use crate::ranking::terms::expand_terms;
use crate::ranking::Ranker;

/// Extra score for a single-word term that also appears in a product tag
pub const TAG_BONUS: f64 = 0.2;

/// Score of one product against one set of labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductScore {
    pub score: f64,
    pub matched: Vec<MatchedLabel>,
}

/// A label with its expanded term set, computed once per request
#[derive(Debug, Clone)]
struct ExpandedLabel<'a> {
    label: &'a Label,
    weight: f64,
    terms: BTreeSet<String>,
}

fn expand_labels(labels: &[Label]) -> Vec<ExpandedLabel<'_>> {
    labels
        .iter()
        .map(|label| ExpandedLabel {
            label,
            weight: label.weight(),
            terms: expand_terms(&label.description),
        })
        .collect()
}

/// Searchable views of a product's text
struct ProductText {
    text: String,
    tokens: HashSet<String>,
    tag_tokens: HashSet<String>,
}

impl ProductText {
    fn new(product: &Product) -> Self {
        let joined = format!(
            "{} {} {}",
            product.title,
            product.description,
            product.tags.join(" ")
        );
        let text = normalize(&joined);
        let tokens = tokenize(&text).into_iter().collect();
        let tag_tokens = product.tags.iter().flat_map(|tag| tokenize(tag)).collect();

        Self {
            text,
            tokens,
            tag_tokens,
        }
    }

    fn score(&self, labels: &[ExpandedLabel<'_>]) -> ProductScore {
        let mut result = ProductScore::default();

        for expanded in labels {
            let mut label_matched = false;

            for term in &expanded.terms {
                let is_phrase = term.contains(' ');
                let hit = if is_phrase {
                    self.text.contains(term.as_str())
                } else {
                    self.tokens.contains(term)
                };
                if !hit {
                    continue;
                }

                result.score += expanded.weight;
                if !is_phrase && self.tag_tokens.contains(term) {
                    result.score += TAG_BONUS;
                }
                label_matched = true;
            }

            if label_matched {
                result.matched.push(MatchedLabel {
                    label: expanded.label.description.clone(),
                    weight: expanded.weight,
                });
            }
        }

        result
    }
}

/// Score one product against labels. Empty labels give a zero score.
pub fn score_product(product: &Product, labels: &[Label]) -> ProductScore {
    ProductText::new(product).score(&expand_labels(labels))
}

fn into_scored(product: &Product, score: ProductScore) -> ScoredProduct {
    let mut product = product.clone();
    // computed fields win over catalog fields of the same name
    product.extra.remove("score");
    product.extra.remove("matched");

    ScoredProduct {
        product,
        score: score.score,
        matched: score.matched,
    }
}

/// Rule-based ranker: synonym-expanded word and phrase matching
pub struct LexicalRanker;

impl LexicalRanker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LexicalRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl Ranker for LexicalRanker {
    fn rank(&self, labels: &[Label], products: &[Product], limit: usize) -> Vec<ScoredProduct> {
        let expanded = expand_labels(labels);

        let mut ranked: Vec<ScoredProduct> = products
            .iter()
            .map(|product| into_scored(product, ProductText::new(product).score(&expanded)))
            .filter(|scored| scored.score > 0.0)
            .collect();

        // Stable: equal scores keep catalog order
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(limit);

        ranked
    }

    fn name(&self) -> &str {
        "lexical"
    }
}
