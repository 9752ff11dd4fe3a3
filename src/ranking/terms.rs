use std::collections::BTreeSet;

use crate::ranking::normalize::{normalize, tokenize};
use crate::ranking::synonyms;

/// Candidate match terms for one label: the whole phrase, its tokens, and
/// the synonyms of both. Every term is normalized; hyphens in the label are
/// treated as word breaks.
pub fn expand_terms(label: &str) -> BTreeSet<String> {
    let base = normalize(&normalize(label).replace('-', " "));
    let tokens = tokenize(&base);

    let mut terms = BTreeSet::new();
    if !base.is_empty() {
        insert_synonyms(&mut terms, &base);
        terms.insert(base);
    }
    for token in tokens {
        insert_synonyms(&mut terms, &token);
        terms.insert(token);
    }

    terms
}

fn insert_synonyms(terms: &mut BTreeSet<String>, key: &str) {
    if let Some(alternates) = synonyms::lookup(key) {
        terms.extend(
            alternates
                .iter()
                .map(|alt| normalize(alt))
                .filter(|alt| !alt.is_empty()),
        );
    }
}
