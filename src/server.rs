//! HTTP surface: catalog passthrough, image search, the static catalog asset
//! and a health probe.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::{services::ServeFile, set_header::SetResponseHeaderLayer};

use crate::catalog::{base_url_from_headers, CatalogSource, HttpCatalog};
use crate::config::ServerConfig;
use crate::core::{CatalogResponse, SearchResponse};
use crate::engine::{SearchEngine, SearchQuery};
use crate::error::SearchError;

/// Base64 images are large; the axum default of 2 MiB is too small
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    engine: Arc<SearchEngine>,
    client: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig, engine: SearchEngine, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            client,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn make_app(state: AppState) -> Router {
    let search_routes = axum::routing::post(search_handler)
        .options(preflight_handler)
        .fallback(search_method_not_allowed)
        .layer::<_, Infallible>(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer::<_, Infallible>(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/search",
            // `get` alone would also answer HEAD
            get(catalog_handler)
                .head(catalog_method_not_allowed)
                .fallback(catalog_method_not_allowed),
        )
        .route("/api/vision-search", search_routes)
        .route_service(
            &state.config.static_catalog_path,
            ServeFile::new(&state.config.catalog_path),
        )
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

// Catalog passthrough

async fn catalog_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, CatalogApiError> {
    let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let base_url = base_url_from_headers(
        header_str("x-forwarded-proto"),
        header_str("x-forwarded-host"),
        header_str(header::HOST.as_str()),
    );

    let catalog = HttpCatalog::new(
        state.client.clone(),
        base_url,
        state.config.static_catalog_path.clone(),
    );
    let products = catalog.load_raw().await?;
    let response = CatalogResponse::new(products);

    tracing::debug!("Catalog passthrough: {} products from {}", response.count, catalog.url());

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(response),
    )
        .into_response())
}

async fn catalog_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        Json(json!({ "ok": false, "error": "Method Not Allowed" })),
    )
        .into_response()
}

// Image search

async fn search_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SearchResponse>, SearchApiError> {
    let body = body.map_err(body_rejection)?;
    let query = parse_search_body(&body)?;
    tracing::debug!(
        "Search request: {} image bytes, limit {:?}",
        query.image.len(),
        query.limit
    );

    let response = state.engine.search(query).await?;

    Ok(Json(response))
}

async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn search_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
            details: None,
        }),
    )
        .into_response()
}

fn body_rejection(rejection: BytesRejection) -> SearchError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SearchError::BodyTooLarge { limit: MAX_BODY_BYTES }
    } else {
        SearchError::InvalidBody(rejection.body_text())
    }
}

/// Lenient body parsing: `image` must be a non-empty string, `limit` may be
/// a number or a numeric string.
fn parse_search_body(body: &[u8]) -> Result<SearchQuery, SearchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SearchError::MissingImage);
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|_| SearchError::InvalidBody("Invalid JSON body".to_string()))?;

    let image = payload
        .get("image")
        .and_then(Value::as_str)
        .filter(|image| !image.is_empty())
        .ok_or(SearchError::MissingImage)?;

    let limit = match payload.get("limit") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(SearchQuery {
        image: image.to_string(),
        limit,
    })
}

// Error handling

/// Errors of the search endpoint: `{error, details?}` bodies
struct SearchApiError(SearchError);

impl IntoResponse for SearchApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self.0 {
            e @ SearchError::MissingImage => (StatusCode::BAD_REQUEST, e.to_string(), None),
            SearchError::InvalidBody(message) => (StatusCode::BAD_REQUEST, message, None),
            e @ SearchError::BodyTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, e.to_string(), None)
            }
            e @ SearchError::MissingApiKey => {
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None)
            }
            SearchError::LabelService { body, .. } => (
                StatusCode::BAD_GATEWAY,
                "Vision API request failed".to_string(),
                Some(body),
            ),
            e => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error".to_string(),
                Some(e.to_string()),
            ),
        };

        tracing::error!("❌ Search error: {} - {}", status, details.as_deref().unwrap_or(&error));

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl<E> From<E> for SearchApiError
where
    E: Into<SearchError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Errors of the catalog endpoint: `{ok: false, error}` bodies
struct CatalogApiError(SearchError);

impl IntoResponse for CatalogApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SearchError::CatalogFetch { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.to_string();

        tracing::error!("❌ Catalog error: {} - {}", status, message);

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}

impl<E> From<E> for CatalogApiError
where
    E: Into<SearchError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
