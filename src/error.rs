use thiserror::Error;

/// Main error type for product search
#[derive(Error, Debug)]
pub enum SearchError {
    /// Request carried no usable image
    #[error("No image provided")]
    MissingImage,

    /// Request body could not be parsed
    #[error("{0}")]
    InvalidBody(String),

    /// Request body is over the upload limit
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// None of the API key variables is set
    #[error("Missing Vision API key. Set GOOGLE_VISION_API_KEY, GOOGLE_API_KEY or VISION_API_KEY")]
    MissingApiKey,

    /// Label service answered with a non-success status
    #[error("Vision API request failed ({status}): {body}")]
    LabelService { status: u16, body: String },

    /// Static catalog asset could not be fetched
    #[error("Failed to load {path}: {status}")]
    CatalogFetch { path: String, status: u16 },

    /// Catalog payload has neither a product array nor an `items` array
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(SearchError::MissingImage.to_string(), "No image provided");
        assert!(SearchError::MissingApiKey
            .to_string()
            .starts_with("Missing Vision API key"));

        let err = SearchError::CatalogFetch {
            path: "/products.json".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "Failed to load /products.json: 404");
    }

    #[test]
    fn test_body_too_large_message() {
        let err = SearchError::BodyTooLarge { limit: 1024 };
        assert_eq!(err.to_string(), "Request body exceeds 1024 bytes");
    }
}
