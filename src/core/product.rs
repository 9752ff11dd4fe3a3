use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deserialize a text field from string, number or null (catalogs are hand-edited JSON)
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextValue {
        String(String),
        Number(serde_json::Number),
        Bool(bool),
        Null,
    }

    Ok(match TextValue::deserialize(deserializer)? {
        TextValue::String(s) => s,
        TextValue::Number(n) => n.to_string(),
        TextValue::Bool(b) => b.to_string(),
        TextValue::Null => String::new(),
    })
}

/// Deserialize tags from an array (non-string entries dropped), a single string, or null
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

/// A catalog entry. Unknown fields are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Product title
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,

    /// Free-text description
    #[serde(default, deserialize_with = "deserialize_text")]
    pub description: String,

    /// Tags/keywords
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,

    /// Passthrough fields (id, price, image, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Create a product with a title only
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// A label that contributed to a product's score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchedLabel {
    pub label: String,
    pub weight: f64,
}

/// Product plus its relevance against one set of labels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,

    /// Sum of label weights and tag bonuses (never negative)
    pub score: f64,

    /// Labels that matched, in label input order
    #[serde(default)]
    pub matched: Vec<MatchedLabel>,
}
