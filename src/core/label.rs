use serde::{Deserialize, Serialize};

/// Weight used when a label carries no usable confidence
pub const DEFAULT_LABEL_WEIGHT: f64 = 0.5;

/// A label returned by the image-labeling service
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Label {
    /// Label text (usually English)
    #[serde(default)]
    pub description: String,

    /// Confidence (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Topicality (0.0 - 1.0), passed through only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topicality: Option<f64>,
}

impl Label {
    pub fn new(description: impl Into<String>, score: f64) -> Self {
        Self {
            description: description.into(),
            score: Some(score),
            topicality: None,
        }
    }

    /// Scoring weight: the confidence, or 0.5 when absent, zero or not a number
    pub fn weight(&self) -> f64 {
        match self.score {
            Some(score) if score.is_finite() && score != 0.0 => score,
            _ => DEFAULT_LABEL_WEIGHT,
        }
    }
}
