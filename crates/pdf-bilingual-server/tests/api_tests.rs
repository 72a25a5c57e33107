use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lopdf::{Dictionary, Document, Object, Stream};
use pdf_bilingual::*;
use pdf_bilingual_server::{build_router, state::AppState};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

const API_KEY: &str = "test-key";

fn create_test_pdf(num_pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

struct FixedPagesClient {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl RenderClient for FixedPagesClient {
    async fn render(&self, section: Section, _request: RenderRequest) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BilingualError::Render {
                section,
                message: "renderer returned HTTP 503".to_string(),
            });
        }
        Ok(match section {
            Section::Toc => create_test_pdf(1),
            Section::Body(Language::En) => create_test_pdf(3),
            Section::Body(Language::Ja) => create_test_pdf(5),
        })
    }
}

fn app(fail: bool, config: EngineConfig) -> (Router, Arc<FixedPagesClient>) {
    let client = Arc::new(FixedPagesClient {
        calls: AtomicUsize::new(0),
        fail,
    });
    let engine = BilingualEngine::new(client.clone(), config).unwrap();
    let router = build_router(AppState::new(engine, Some(API_KEY.to_string())));
    (router, client)
}

fn body(first_language: &str) -> Value {
    json!({
        "htmlFirst": "<h1>Hello</h1>",
        "htmlSecond": "<h1>こんにちは</h1>",
        "toc": {
            "title": "Quarterly Review",
            "titleSecondary": "四半期レビュー",
            "date": "2026-10-01"
        },
        "firstLanguage": first_language
    })
}

fn post(payload: String, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/bilingual")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(payload)).unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_needs_no_key() {
    let (router, _) = app(false, EngineConfig::default());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_generate_returns_documents_and_page_info() {
    let (router, client) = app(false, EngineConfig::default());

    let (status, json) = send(router, post(body("ja").to_string(), Some(API_KEY))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    assert_eq!(json["firstLanguage"], "ja");
    assert_eq!(json["pageInfo"]["tocPages"], 1);
    assert_eq!(json["pageInfo"]["firstPages"], 5);
    assert_eq!(json["pageInfo"]["secondPages"], 3);
    assert_eq!(json["pageInfo"]["totalPages"], 9);

    let combined = STANDARD.decode(json["combined"].as_str().unwrap()).unwrap();
    let doc = Document::load_mem(&combined).unwrap();
    assert_eq!(doc.get_pages().len(), 9);

    let first = STANDARD
        .decode(json["firstLanguageDoc"].as_str().unwrap())
        .unwrap();
    assert_eq!(first, create_test_pdf(5));
}

#[tokio::test]
async fn test_missing_key_rejected() {
    let (router, client) = app(false, EngineConfig::default());

    let (status, json) = send(router, post(body("en").to_string(), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["kind"], "unauthorized");
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_key_rejected() {
    let (router, _) = app(false, EngineConfig::default());
    let (status, _) = send(router, post(body("en").to_string(), Some("nope"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let (router, _) = app(false, EngineConfig::default());

    let (status, json) = send(router, post("{\"htmlFirst\":".to_string(), Some(API_KEY))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation");
}

#[tokio::test]
async fn test_missing_toc_title_is_validation_error() {
    let (router, client) = app(false, EngineConfig::default());
    let mut payload = body("en");
    payload["toc"]["title"] = json!("");

    let (status, json) = send(router, post(payload.to_string(), Some(API_KEY))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation");
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_html_is_413() {
    let config = EngineConfig {
        max_html_bytes: 1024,
        ..Default::default()
    };
    let (router, client) = app(false, config);
    let mut payload = body("en");
    payload["htmlFirst"] = json!("<p>".repeat(1000));

    let (status, json) = send(router, post(payload.to_string(), Some(API_KEY))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["kind"], "payload_too_large");
    assert!(!json["message"].as_str().unwrap().contains("<p>"));
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_render_failure_is_500() {
    let (router, _) = app(true, EngineConfig::default());

    let (status, json) = send(router, post(body("en").to_string(), Some(API_KEY))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["kind"], "render");
    assert!(json.get("combined").is_none());
}
