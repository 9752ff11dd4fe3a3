//! Text normalization shared by catalog text and label terms.
//!
//! Normalized text is lowercase, has `ё` folded to `е`, keeps only ASCII
//! letters, Cyrillic `а`..`я`, ASCII digits, whitespace and `-`, and has
//! whitespace runs collapsed to a single space with no leading or trailing
//! whitespace. Normalizing normalized text returns it unchanged.

fn is_kept(c: char) -> bool {
    c.is_ascii_lowercase()
        || ('а'..='я').contains(&c)
        || c.is_ascii_digit()
        || c == '-'
        || c.is_whitespace()
}

/// Normalize arbitrary text for matching. Never fails; empty in, empty out.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c == 'ё' { 'е' } else { c })
        .filter(|&c| is_kept(c))
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize, then split into non-empty tokens in input order.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
