//! Request handlers

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use url::Url;

use crate::media::{ResponseDetail, VideoInfo};
use crate::platforms::{is_supported, PLATFORM_CATALOG};
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::utils::error::VidgateError;

/// Body accepted by the info and download endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoRequest {
    pub url: String,
    #[serde(default = "default_quality")]
    pub quality: String,
    #[serde(default)]
    pub audio_only: bool,
}

fn default_quality() -> String {
    "best".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub status: String,
    pub message: String,
    pub video_info: VideoInfo,
    pub download_url: String,
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "message": "Vidgate is running"}))
}

pub async fn platforms() -> Json<Value> {
    Json(json!({ "platforms": PLATFORM_CATALOG }))
}

/// Full metadata for one URL, including the per-item download list.
pub async fn video_info(
    State(state): State<AppState>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<VideoInfo>, ApiError> {
    if !is_supported(&request.url) {
        return Err(VidgateError::UnsupportedPlatform.into());
    }

    info!("Info request for {}", request.url);
    let doc = state
        .extractor
        .extract(&request.url)
        .await
        .map_err(|err| ApiError::from_extraction("Failed to get video info", err))?;

    Ok(Json(VideoInfo::build(
        &doc,
        &request.quality,
        request.audio_only,
        ResponseDetail::Full,
    )))
}

/// Direct-URL resolution: compact metadata plus one ready download link.
pub async fn video_download(
    State(state): State<AppState>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<DownloadResponse>, ApiError> {
    if !is_supported(&request.url) {
        return Err(VidgateError::UnsupportedPlatform.into());
    }

    info!("Download request for {}", request.url);
    let doc = state
        .extractor
        .extract(&request.url)
        .await
        .map_err(|err| ApiError::from_extraction("Failed to process video", err))?;

    let video_info = VideoInfo::build(
        &doc,
        &request.quality,
        request.audio_only,
        ResponseDetail::Compact,
    );
    let Some(download_url) = video_info.download_url.clone() else {
        return Err(ApiError::bad_request("Could not extract download URL"));
    };

    Ok(Json(DownloadResponse {
        status: "ready".to_string(),
        message: "Download URL ready".to_string(),
        video_info,
        download_url,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub url: String,
}

/// Stream a resolved media URL back through the API so browser clients
/// are not stopped by the CDN's CORS policy.
pub async fn proxy_download(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(params): Query<ProxyParams>,
) -> Result<Response, ApiError> {
    let target = Url::parse(&params.url)
        .map_err(|_| ApiError::bad_request("Download failed: invalid URL"))?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(ApiError::bad_request("Download failed: unsupported URL scheme"));
    }

    let upstream = state
        .client
        .get(target)
        .send()
        .await
        .map_err(|err| ApiError::bad_request(format!("Download failed: {err}")))?;

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("video/mp4")
        .to_string();

    Response::builder()
        .header(CONTENT_TYPE, content_type)
        .header(
            CONTENT_DISPOSITION,
            format!("attachment; filename={video_id}.mp4"),
        )
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|err| ApiError::internal(format!("Download failed: {err}")))
}
