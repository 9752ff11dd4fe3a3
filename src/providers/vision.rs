use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::{api_key_from_env, VisionConfig};
use crate::core::Label;
use crate::error::{Result, SearchError};
use crate::providers::LabelProvider;

/// Google Cloud Vision label detection
pub struct VisionProvider {
    client: Client,
    config: VisionConfig,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent<'a>,
    features: [Feature; 1],
}

#[derive(Debug, Serialize)]
struct ImageContent<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    max_results: u32,
}

impl VisionProvider {
    /// Provider that resolves its API key from the environment on every call
    pub fn new(client: Client, config: VisionConfig) -> Self {
        Self {
            client,
            config,
            api_key: None,
        }
    }

    /// Provider with a fixed API key
    pub fn with_api_key(client: Client, config: VisionConfig, api_key: impl Into<String>) -> Self {
        Self {
            client,
            config,
            api_key: Some(api_key.into()),
        }
    }

    fn api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(api_key_from_env)
            .ok_or(SearchError::MissingApiKey)
    }

    fn request_body<'a>(&self, image_base64: &'a str) -> AnnotateRequest<'a> {
        AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent {
                    content: image_base64,
                },
                features: [Feature {
                    kind: "LABEL_DETECTION",
                    max_results: self.config.max_labels,
                }],
            }],
        }
    }
}

/// Labels from an `images:annotate` response; anything malformed yields none
pub fn parse_labels(payload: &Value) -> Vec<Label> {
    let first = payload.get("responses").and_then(|r| r.get(0));

    if let Some(error) = first.and_then(|r| r.get("error")) {
        tracing::warn!("Vision API returned an error for the image: {}", error);
    }

    let Some(annotations) = first
        .and_then(|r| r.get("labelAnnotations"))
        .and_then(Value::as_array)
    else {
        tracing::debug!("No labelAnnotations in Vision API response");
        return Vec::new();
    };

    annotations
        .iter()
        .filter(|a| a.is_object())
        .filter_map(|a| serde_json::from_value::<Label>(a.clone()).ok())
        .collect()
}

#[async_trait]
impl LabelProvider for VisionProvider {
    fn check_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn detect_labels(&self, image_base64: &str) -> Result<Vec<Label>> {
        let api_key = self.api_key()?;
        let url = format!("{}?key={}", self.config.api_url, urlencoding::encode(&api_key));

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(image_base64))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::LabelService {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Vision API returned invalid JSON: {}", e);
                Value::Null
            }
        };

        let labels = parse_labels(&payload);
        tracing::debug!("Vision API returned {} labels", labels.len());

        Ok(labels)
    }

    fn name(&self) -> &str {
        "google-vision"
    }
}
