//! Environment-driven configuration.
//!
//! Everything is read once at startup except the Vision API key, which is
//! resolved per request so the server can come up without it.

use std::path::PathBuf;

/// API key variables, checked in order; first non-empty wins
pub const API_KEY_VARS: [&str; 3] = ["GOOGLE_VISION_API_KEY", "GOOGLE_API_KEY", "VISION_API_KEY"];

/// Paths owned by the API routes; the static catalog may not shadow them
pub const RESERVED_PATHS: [&str; 3] = ["/api/search", "/api/vision-search", "/health"];

pub const DEFAULT_VISION_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Label service settings
#[derive(Debug, Clone, PartialEq)]
pub struct VisionConfig {
    /// `images:annotate` endpoint
    pub api_url: String,

    /// `maxResults` for label detection
    pub max_labels: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_VISION_API_URL.to_string(),
            max_labels: 20,
        }
    }
}

impl VisionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_url: lookup("VISION_API_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_url),
            max_labels: lookup("VISION_MAX_LABELS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_labels),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Local catalog file, also served as the static asset
    pub catalog_path: PathBuf,

    /// URL path of the static catalog asset
    pub static_catalog_path: String,

    pub vision: VisionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            catalog_path: PathBuf::from("public/products.json"),
            static_catalog_path: "/products.json".to_string(),
            vision: VisionConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let static_catalog_path = lookup("STATIC_CATALOG_URL_PATH")
            .filter(|v| !v.is_empty())
            .map(|v| if v.starts_with('/') { v } else { format!("/{}", v) })
            .filter(|v| {
                let reserved = RESERVED_PATHS.contains(&v.as_str());
                if reserved {
                    tracing::warn!("⚠️ STATIC_CATALOG_URL_PATH {} is an API route, using the default", v);
                }
                !reserved
            })
            .unwrap_or(defaults.static_catalog_path);

        Self {
            host: lookup("HOST").filter(|v| !v.is_empty()).unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            catalog_path: lookup("CATALOG_PATH")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            static_catalog_path,
            vision: VisionConfig::from_lookup(&lookup),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// First non-empty API key from [`API_KEY_VARS`]
pub fn resolve_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|&var| lookup(var))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// [`resolve_api_key`] against the process environment
pub fn api_key_from_env() -> Option<String> {
    resolve_api_key(|key| std::env::var(key).ok())
}
