//! End-to-end tests for the HTTP surface, with the extractor stubbed out so
//! no subprocess runs and no platform is contacted.

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vidgate::extractor::{MediaMetadata, MetadataExtractor};
use vidgate::server::{build_router, AppState};
use vidgate::VidgateError;

enum StubBehavior {
    Document(Box<MediaMetadata>),
    Failure(String),
}

/// Canned extractor so handler behavior can be pinned down exactly.
struct StubExtractor {
    behavior: StubBehavior,
    calls: AtomicUsize,
}

impl StubExtractor {
    fn serving(doc: MediaMetadata) -> Arc<Self> {
        Arc::new(Self {
            behavior: StubBehavior::Document(Box::new(doc)),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            behavior: StubBehavior::Failure(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataExtractor for StubExtractor {
    fn id(&self) -> &'static str {
        "stub"
    }

    async fn extract(&self, _url: &str) -> anyhow::Result<MediaMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            StubBehavior::Document(doc) => Ok((**doc).clone()),
            StubBehavior::Failure(message) => {
                Err(VidgateError::ExtractionError(message.clone()).into())
            }
        }
    }
}

/// Serve the real router on a loopback port, returning its base URL.
async fn spawn_server(extractor: Arc<StubExtractor>) -> String {
    let state = AppState::new(extractor);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

fn sample_doc() -> MediaMetadata {
    serde_json::from_str(
        r#"{
            "title": "Orbit Test Flight",
            "duration": 205,
            "thumbnail": "https://thumbs.example/main.jpg",
            "thumbnails": ["https://thumbs.example/main.jpg", "https://thumbs.example/alt.jpg"],
            "uploader": "Flight Lab",
            "upload_date": "20240105",
            "view_count": 4200,
            "like_count": 77,
            "description": "Full pad-to-orbit coverage.",
            "extractor_key": "YouTube",
            "formats": [
                {"format_id": "140", "ext": "m4a", "url": "https://cdn.example/a140",
                 "vcodec": "none", "acodec": "mp4a.40.2", "abr": 128.0},
                {"format_id": "18", "ext": "mp4", "url": "https://cdn.example/v18",
                 "vcodec": "avc1", "acodec": "mp4a", "width": 640, "height": 360},
                {"format_id": "22", "ext": "mp4", "url": "https://cdn.example/v22",
                 "vcodec": "avc1", "acodec": "mp4a", "width": 1280, "height": 720}
            ]
        }"#,
    )
    .expect("sample doc")
}

#[tokio::test]
async fn health_reports_service_status() {
    let base = spawn_server(StubExtractor::failing("unused")).await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["message"], "Vidgate is running");
}

#[tokio::test]
async fn platform_catalog_lists_supported_sites() {
    let base = spawn_server(StubExtractor::failing("unused")).await;
    let body: Value = reqwest::get(format!("{base}/api/platforms"))
        .await
        .expect("request")
        .json()
        .await
        .expect("json");
    let platforms = body["platforms"].as_array().expect("platforms array");
    assert_eq!(platforms.len(), 9);
    assert!(platforms.iter().any(|p| p["name"] == "YouTube"));
    assert!(platforms.iter().all(|p| p["supports_audio"] == true));
}

#[tokio::test]
async fn unsupported_url_is_rejected_without_extraction() {
    let stub = StubExtractor::serving(sample_doc());
    let base = spawn_server(stub.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/info"))
        .json(&json!({"url": "https://example.com/watch?v=1"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["detail"], "Unsupported platform");
    assert_eq!(stub.calls(), 0, "gate must fire before the extractor runs");
}

#[tokio::test]
async fn info_returns_normalized_document() {
    let base = spawn_server(StubExtractor::serving(sample_doc())).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/info"))
        .json(&json!({"url": "https://www.youtube.com/watch?v=orb1t"}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let info: Value = response.json().await.expect("json");
    assert_eq!(info["title"], "Orbit Test Flight");
    assert_eq!(info["duration"], 205);
    assert_eq!(info["duration_string"], "03:25");
    assert_eq!(info["upload_date"], "2024-01-05");
    assert_eq!(info["uploader"], "Flight Lab");
    assert_eq!(info["website"], "YouTube");
    assert_eq!(info["media_type"], "video");
    assert_eq!(info["description"], "Full pad-to-orbit coverage....");
    assert_eq!(info["download_url"], "https://cdn.example/v22");
    assert_eq!(info["formats"].as_array().expect("formats").len(), 3);

    let items = info["media_items"].as_array().expect("media items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "video");
    assert_eq!(items[0]["url"], "https://cdn.example/v22");
    assert_eq!(items[0]["quality"], "720p");
    assert_eq!(items[0]["filename"], "Orbit Test Flight.mp4");

    assert!(info.get("_error").is_none());
}

#[tokio::test]
async fn info_wraps_extraction_failures() {
    let base = spawn_server(StubExtractor::failing("no formats found")).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/info"))
        .json(&json!({"url": "https://www.youtube.com/watch?v=gone"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    let detail = body["detail"].as_str().expect("detail");
    assert!(detail.starts_with("Failed to get video info:"), "{detail}");
    assert!(detail.contains("no formats found"), "{detail}");
}

#[tokio::test]
async fn numeric_quality_cap_picks_capped_variant() {
    let base = spawn_server(StubExtractor::serving(sample_doc())).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/info"))
        .json(&json!({"url": "https://www.youtube.com/watch?v=orb1t", "quality": "480"}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let info: Value = response.json().await.expect("json");
    assert_eq!(info["download_url"], "https://cdn.example/v18");
    let items = info["media_items"].as_array().expect("media items");
    assert_eq!(items[0]["quality"], "360p");
    assert_eq!(items[0]["filename"], "Orbit Test Flight_480.mp4");
}

#[tokio::test]
async fn audio_request_yields_single_audio_item() {
    let base = spawn_server(StubExtractor::serving(sample_doc())).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/info"))
        .json(&json!({"url": "https://www.youtube.com/watch?v=orb1t", "audio_only": true}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let info: Value = response.json().await.expect("json");
    assert_eq!(info["media_type"], "audio");
    assert_eq!(info["download_url"], "https://cdn.example/a140");

    let items = info["media_items"].as_array().expect("media items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "audio");
    assert_eq!(items[0]["url"], "https://cdn.example/a140");
    assert_eq!(items[0]["format"], "mp3");
    assert_eq!(items[0]["quality"], "128kbps");
    assert_eq!(items[0]["filename"], "Orbit Test Flight.mp3");
}

#[tokio::test]
async fn download_returns_ready_payload() {
    let base = spawn_server(StubExtractor::serving(sample_doc())).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/download"))
        .json(&json!({"url": "https://www.youtube.com/watch?v=orb1t"}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("json");
    assert_eq!(body["status"], "ready");
    assert_eq!(body["message"], "Download URL ready");
    assert_eq!(body["download_url"], "https://cdn.example/v22");
    // compact detail: the format listing is not echoed back
    assert_eq!(body["video_info"]["formats"].as_array().expect("formats").len(), 0);
    assert_eq!(body["video_info"]["title"], "Orbit Test Flight");
}

#[tokio::test]
async fn download_without_resolvable_url_is_rejected() {
    let doc: MediaMetadata = serde_json::from_str(
        r#"{
            "title": "Ghost Clip",
            "formats": [
                {"format_id": "37", "ext": "mp4", "vcodec": "avc1", "acodec": "none", "height": 1080}
            ]
        }"#,
    )
    .expect("doc");
    let base = spawn_server(StubExtractor::serving(doc)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/download"))
        .json(&json!({"url": "https://www.youtube.com/watch?v=gh0st"}))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["detail"], "Could not extract download URL");
}

#[tokio::test]
async fn degraded_document_carries_error_marker() {
    let mut doc = sample_doc();
    doc.partial_error = Some(
        "Bot verification blocked extraction; returning limited information.".to_string(),
    );
    let base = spawn_server(StubExtractor::serving(doc)).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/video/info"))
        .json(&json!({"url": "https://www.youtube.com/watch?v=orb1t"}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200, "degraded docs still answer 200");

    let info: Value = response.json().await.expect("json");
    let marker = info["_error"].as_str().expect("_error marker");
    assert!(marker.contains("Bot verification"));
}

/// Tiny upstream the proxy can pull from.
async fn spawn_upstream() -> String {
    let app = Router::new().route(
        "/media.bin",
        get(|| async { ([(CONTENT_TYPE, "application/octet-stream")], "proxied payload") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve upstream");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn proxy_streams_upstream_bytes() {
    let upstream = spawn_upstream().await;
    let base = spawn_server(StubExtractor::failing("unused")).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/api/video/proxy/clip99"))
        .query(&[("url", format!("{upstream}/media.bin"))])
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=clip99.mp4")
    );
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/octet-stream")
    );
    let body = response.bytes().await.expect("body");
    assert_eq!(&body[..], b"proxied payload");
}

#[tokio::test]
async fn proxy_rejects_non_http_schemes() {
    let base = spawn_server(StubExtractor::failing("unused")).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/api/video/proxy/x"))
        .query(&[("url", "file:///etc/hosts")])
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["detail"], "Download failed: unsupported URL scheme");
}

#[tokio::test]
async fn proxy_rejects_unparseable_url() {
    let base = spawn_server(StubExtractor::failing("unused")).await;

    let response = reqwest::Client::new()
        .get(format!("{base}/api/video/proxy/x"))
        .query(&[("url", "not a url")])
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("json");
    assert_eq!(body["detail"], "Download failed: invalid URL");
}
