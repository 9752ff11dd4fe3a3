#![cfg(feature = "server")]

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::Query,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use vision_product_search::{
    catalog::FileCatalog,
    config::{ServerConfig, VisionConfig},
    providers::{LabelProvider, VisionProvider},
    server::{make_app, AppState},
    Label, SearchEngine, SearchError,
};

async fn spawn_upstream(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn write_catalog(products: Value) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), serde_json::to_vec(&products).unwrap()).unwrap();
    file
}

fn sample_catalog() -> Value {
    json!([
        {"id": 1, "title": "Red T-Shirt", "description": "Classic fit", "tags": ["cotton"]},
        {"id": 2, "title": "Ceramic Mug", "tags": ["kitchen"]},
        {"id": 3, "title": "Blue T-Shirt", "tags": ["polyester"]}
    ])
}

fn app_with_provider(catalog: &Path, provider: Arc<dyn LabelProvider>) -> Router {
    let config = ServerConfig {
        catalog_path: catalog.to_path_buf(),
        ..ServerConfig::default()
    };
    let engine = SearchEngine::new(Arc::new(FileCatalog::new(catalog)), provider);
    make_app(AppState::new(config, engine, reqwest::Client::new()))
}

fn app_with_vision(catalog: &Path, vision_addr: SocketAddr) -> Router {
    let vision = VisionConfig {
        api_url: format!("http://{}/annotate", vision_addr),
        max_labels: 20,
    };
    let provider = VisionProvider::with_api_key(reqwest::Client::new(), vision, "test-key");
    app_with_provider(catalog, Arc::new(provider))
}

/// Fake `images:annotate` that checks the request and answers with fixed labels
async fn spawn_vision(labels: Value) -> SocketAddr {
    let app = Router::new().route(
        "/annotate",
        post(
            move |Query(params): Query<HashMap<String, String>>, Json(body): Json<Value>| {
                let labels = labels.clone();
                async move {
                    assert_eq!(params.get("key").map(String::as_str), Some("test-key"));
                    let request = &body["requests"][0];
                    assert_eq!(request["features"][0]["type"], "LABEL_DETECTION");
                    assert_eq!(request["features"][0]["maxResults"], 20);
                    assert_eq!(request["image"]["content"], "AAAA");

                    Json(json!({"responses": [{"labelAnnotations": labels}]}))
                }
            },
        ),
    );
    spawn_upstream(app).await
}

fn search_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/vision-search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

struct UnconfiguredProvider;

#[async_trait]
impl LabelProvider for UnconfiguredProvider {
    fn check_configured(&self) -> vision_product_search::Result<()> {
        Err(SearchError::MissingApiKey)
    }

    async fn detect_labels(&self, _image_base64: &str) -> vision_product_search::Result<Vec<Label>> {
        panic!("must not be called without credentials");
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

// Search endpoint

#[tokio::test]
async fn search_ranks_catalog_against_labels() {
    let catalog = write_catalog(sample_catalog());
    let vision = spawn_vision(json!([
        {"description": "T-shirt", "score": 0.9, "topicality": 0.9},
        {"description": "Cotton", "score": 0.8, "topicality": 0.7}
    ]))
    .await;

    let response = app_with_vision(catalog.path(), vision)
        .oneshot(search_request(json!({"image": "data:image/jpeg;base64,AAAA"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body = json_body(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["labels"][1]["description"], "Cotton");

    let first = &body["products"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["title"], "Red T-Shirt");
    let score = first["score"].as_f64().unwrap();
    assert!((score - 1.9).abs() < 1e-9);
    assert_eq!(first["matched"], json!([
        {"label": "T-shirt", "weight": 0.9},
        {"label": "Cotton", "weight": 0.8}
    ]));

    assert_eq!(body["products"][1]["title"], "Blue T-Shirt");
}

#[tokio::test]
async fn search_caps_limit_at_fifty() {
    let products: Vec<Value> = (0..60)
        .map(|i| json!({"title": format!("Mug {}", i)}))
        .collect();
    let catalog = write_catalog(Value::Array(products));
    let vision = spawn_vision(json!([{"description": "Mug", "score": 0.7}])).await;
    let app = app_with_vision(catalog.path(), vision);

    let body = json_body(
        app.clone()
            .oneshot(search_request(json!({"image": "AAAA", "limit": 1000})))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["count"], 50);
    // equal scores keep catalog order
    assert_eq!(body["products"][0]["title"], "Mug 0");
    assert_eq!(body["products"][49]["title"], "Mug 49");

    for limit in [json!(0), json!(-3), Value::Null] {
        let body = json_body(
            app.clone()
                .oneshot(search_request(json!({"image": "AAAA", "limit": limit})))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["count"], 10);
    }
}

#[tokio::test]
async fn search_with_empty_catalog_is_not_an_error() {
    let catalog = write_catalog(json!([]));
    let vision = spawn_vision(json!([{"description": "Mug", "score": 0.7}])).await;

    let response = app_with_vision(catalog.path(), vision)
        .oneshot(search_request(json!({"image": "AAAA"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["products"], json!([]));
}

#[tokio::test]
async fn search_without_labels_returns_nothing() {
    let catalog = write_catalog(sample_catalog());
    let vision = spawn_upstream(Router::new().route(
        "/annotate",
        post(|| async { Json(json!({"responses": [{}]})) }),
    ))
    .await;

    let body = json_body(
        app_with_vision(catalog.path(), vision)
            .oneshot(search_request(json!({"image": "AAAA"})))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["labels"], json!([]));
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn search_missing_image_is_bad_request() {
    let catalog = write_catalog(sample_catalog());
    let app = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider));

    for body in [json!({}), json!({"limit": 5}), json!({"image": ""})] {
        let response = app.clone().oneshot(search_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "No image provided"}));
    }
}

#[tokio::test]
async fn search_without_api_key_is_server_error() {
    let catalog = write_catalog(sample_catalog());
    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(search_request(json!({"image": "AAAA"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Missing Vision API key"));
}

#[tokio::test]
async fn search_upstream_failure_is_bad_gateway() {
    let catalog = write_catalog(sample_catalog());
    let vision = spawn_upstream(Router::new().route(
        "/annotate",
        post(|| async { (StatusCode::FORBIDDEN, "API key not valid. Please pass a valid API key.") }),
    ))
    .await;

    let response = app_with_vision(catalog.path(), vision)
        .oneshot(search_request(json!({"image": "AAAA"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({
            "error": "Vision API request failed",
            "details": "API key not valid. Please pass a valid API key."
        })
    );
}

#[tokio::test]
async fn search_missing_catalog_is_server_error() {
    let vision = spawn_vision(json!([])).await;
    let response = app_with_vision(Path::new("/definitely/not/here.json"), vision)
        .oneshot(search_request(json!({"image": "AAAA"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Server error");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn search_rejects_other_methods() {
    let catalog = write_catalog(sample_catalog());
    let request = Request::builder()
        .uri("/api/vision-search")
        .body(Body::empty())
        .unwrap();

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(json_body(response).await, json!({"error": "Method not allowed"}));
}

#[tokio::test]
async fn search_preflight() {
    let catalog = write_catalog(sample_catalog());
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/vision-search")
        .header(header::ORIGIN, "https://shop.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
}

#[tokio::test]
async fn search_invalid_json() {
    let catalog = write_catalog(sample_catalog());
    let request = Request::builder()
        .method("POST")
        .uri("/api/vision-search")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "Invalid JSON body"}));
}

#[tokio::test]
async fn search_oversized_body_is_json_error() {
    let catalog = write_catalog(sample_catalog());
    let image = "A".repeat(11 * 1024 * 1024);

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(search_request(json!({"image": image})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        json_body(response).await,
        json!({"error": "Request body exceeds 10485760 bytes"})
    );
}

// Catalog endpoint

fn catalog_request(method: &str, host: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri("/api/search")
        .header(header::HOST, host)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn catalog_passthrough() {
    let catalog = write_catalog(sample_catalog());
    let assets = spawn_upstream(Router::new().route(
        "/products.json",
        get(|| async { Json(sample_catalog()) }),
    ))
    .await;

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(catalog_request("GET", &assets.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(
        json_body(response).await,
        json!({"ok": true, "count": 3, "products": sample_catalog()})
    );
}

#[tokio::test]
async fn catalog_passthrough_counts_items() {
    let catalog = write_catalog(sample_catalog());
    let assets = spawn_upstream(Router::new().route(
        "/products.json",
        get(|| async { Json(json!({"items": [{"title": "Mug"}], "version": 2})) }),
    ))
    .await;

    let request = Request::builder()
        .uri("/api/search")
        .header(header::HOST, "ignored.example.com")
        .header("x-forwarded-host", assets.to_string())
        .header("x-forwarded-proto", "http")
        .body(Body::empty())
        .unwrap();

    let body = json_body(
        app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
            .oneshot(request)
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["count"], 1);
    assert_eq!(body["products"]["version"], 2);
}

#[tokio::test]
async fn catalog_upstream_missing_is_bad_gateway() {
    let catalog = write_catalog(sample_catalog());
    let assets = spawn_upstream(Router::new()).await;

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(catalog_request("GET", &assets.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        json_body(response).await,
        json!({"ok": false, "error": "Failed to load /products.json: 404"})
    );
}

#[tokio::test]
async fn catalog_invalid_payload_is_server_error() {
    let catalog = write_catalog(sample_catalog());
    let assets = spawn_upstream(Router::new().route(
        "/products.json",
        get(|| async { "definitely not json".into_response() }),
    ))
    .await;

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(catalog_request("GET", &assets.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn catalog_rejects_other_methods() {
    let catalog = write_catalog(sample_catalog());
    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(catalog_request("POST", "localhost"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET");
    assert_eq!(
        json_body(response).await,
        json!({"ok": false, "error": "Method Not Allowed"})
    );

    // HEAD never reaches the handler, so no upstream fetch is attempted
    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(catalog_request("HEAD", "127.0.0.1:1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET");
}

// Static asset and health

#[tokio::test]
async fn serves_static_catalog() {
    let catalog = write_catalog(sample_catalog());
    let request = Request::builder()
        .uri("/products.json")
        .body(Body::empty())
        .unwrap();

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, sample_catalog());
}

#[tokio::test]
async fn health() {
    let catalog = write_catalog(sample_catalog());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app_with_provider(catalog.path(), Arc::new(UnconfiguredProvider))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}
