//! Normalized response assembly

use serde::{Deserialize, Serialize};

use crate::extractor::models::{MediaFormat, MediaMetadata};
use crate::media::items::{extract_media_items, MediaItem, MediaKind};
use crate::media::selector::select_variant;
use crate::utils::text::{format_duration, format_upload_date};

const FORMAT_LISTING_LIMIT: usize = 10;
const FULL_DESCRIPTION_CHARS: usize = 500;
const COMPACT_DESCRIPTION_CHARS: usize = 200;

/// How much of the document the response should echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDetail {
    /// Info endpoint: long description, format listing included.
    Full,
    /// Download endpoint: short description, no format listing.
    Compact,
}

/// One row of the format listing echoed back to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSummary {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub quality: Option<f32>,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub filesize: Option<u64>,
}

impl From<&MediaFormat> for FormatSummary {
    fn from(format: &MediaFormat) -> Self {
        Self {
            format_id: format.format_id.clone(),
            ext: format.ext.clone(),
            quality: format.quality,
            height: format.height,
            width: format.width,
            filesize: format.filesize,
        }
    }
}

/// The public metadata schema returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    /// Raw length in whole seconds, when the source provided one.
    pub duration: Option<u64>,
    /// Formatted as HH:MM:SS / MM:SS, or the literal "Unknown".
    pub duration_string: Option<String>,
    pub thumbnail: Option<String>,
    pub thumbnails: Vec<String>,
    pub uploader: String,
    /// Reformatted as YYYY-MM-DD when the 8-digit stamp slices cleanly.
    pub upload_date: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    /// Capped excerpt with a trailing ellipsis; empty when the source has
    /// no description.
    pub description: String,
    /// Source platform, from the extractor key ("YouTube", "Twitter", ...).
    pub website: Option<String>,
    pub media_type: String,
    pub media_items: Vec<MediaItem>,
    pub formats: Vec<FormatSummary>,
    pub download_url: Option<String>,
    /// Present only when extraction was degraded and the document is a
    /// best-effort placeholder.
    #[serde(rename = "_error", skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl VideoInfo {
    /// Normalize one extracted document against the request parameters.
    pub fn build(
        doc: &MediaMetadata,
        quality: &str,
        audio_only: bool,
        detail: ResponseDetail,
    ) -> Self {
        let media_items = extract_media_items(doc, quality, audio_only);
        let download_url = select_variant(&doc.formats, doc.url.as_deref(), quality, audio_only);

        let description_limit = match detail {
            ResponseDetail::Full => FULL_DESCRIPTION_CHARS,
            ResponseDetail::Compact => COMPACT_DESCRIPTION_CHARS,
        };
        let formats = match detail {
            ResponseDetail::Full => doc
                .formats
                .iter()
                .take(FORMAT_LISTING_LIMIT)
                .map(FormatSummary::from)
                .collect(),
            ResponseDetail::Compact => Vec::new(),
        };

        Self {
            title: doc.display_title().to_string(),
            duration: doc.duration_seconds(),
            duration_string: format_duration(doc.duration.as_ref()),
            thumbnail: doc.primary_thumbnail(),
            thumbnails: doc.thumbnail_urls(),
            uploader: doc.uploader_name().to_string(),
            upload_date: doc.upload_date.as_deref().map(format_upload_date),
            view_count: doc.view_count,
            like_count: doc.like_count,
            description: shape_description(doc.description.as_deref(), description_limit),
            website: doc.extractor_key.clone(),
            media_type: classify_media_type(doc, audio_only, &media_items).to_string(),
            media_items,
            formats,
            download_url,
            error: doc.partial_error.clone(),
        }
    }
}

fn classify_media_type(doc: &MediaMetadata, audio_only: bool, items: &[MediaItem]) -> &'static str {
    if doc.is_playlist() {
        "playlist"
    } else if audio_only {
        "audio"
    } else if !items.is_empty() && items.iter().all(|i| i.kind == MediaKind::Image) {
        "image"
    } else {
        "video"
    }
}

/// Non-empty descriptions are capped and always get a trailing ellipsis,
/// matching what API consumers have historically been shown; missing ones
/// come back as an empty string rather than null.
fn shape_description(raw: Option<&str>, limit: usize) -> String {
    match raw {
        Some(desc) if !desc.is_empty() => {
            let cut: String = desc.chars().take(limit).collect();
            format!("{cut}...")
        }
        _ => String::new(),
    }
}
