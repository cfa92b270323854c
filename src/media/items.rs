//! Downloadable item extraction
//!
//! Turns one metadata document into the ordered list of things a client
//! can actually fetch: at most one audio or video pick, plus any image
//! renditions the platform exposes (post thumbnails, carousel frames).

use serde::{Deserialize, Serialize};

use crate::extractor::models::{MediaFormat, MediaMetadata};
use crate::media::selector::{best_audio_variant, best_video_variant, QualityPreference};
use crate::utils::text::sanitize_filename;

const MAX_IMAGE_ITEMS: usize = 10;

/// What kind of payload a media item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

/// One downloadable artifact of an extracted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    pub title: String,
    /// Ready-to-save name, already sanitized, extension included.
    pub filename: String,
    /// Container/extension, not a codec string.
    pub format: String,
    /// Free-text label: "720p", "128kbps", "640x480", or "unknown".
    pub quality: String,
    pub size: Option<u64>,
}

/// Partition a document's formats into concrete downloadable items.
///
/// Documents without a format list but with a direct URL yield exactly one
/// item with an assumed extension. Under `audio_only` the best usable audio
/// variant wins and nothing else is emitted; when no audio is usable the
/// video path runs instead. The video path emits one selected variant plus
/// up to ten image renditions.
pub fn extract_media_items(
    doc: &MediaMetadata,
    quality: &str,
    audio_only: bool,
) -> Vec<MediaItem> {
    let title = doc.display_title();
    let mut items = Vec::new();

    if doc.formats.is_empty() {
        if let Some(url) = &doc.url {
            let (kind, ext) = if audio_only {
                (MediaKind::Audio, "mp3")
            } else {
                (MediaKind::Video, "mp4")
            };
            items.push(MediaItem {
                kind,
                url: url.clone(),
                title: title.to_string(),
                filename: build_filename(title, quality, ext),
                format: ext.to_string(),
                quality: "unknown".to_string(),
                size: None,
            });
        }
        return items;
    }

    if audio_only {
        if let Some(best) = best_audio_variant(&doc.formats) {
            if let Some(url) = &best.url {
                items.push(MediaItem {
                    kind: MediaKind::Audio,
                    url: url.clone(),
                    title: title.to_string(),
                    filename: build_filename(title, quality, "mp3"),
                    format: "mp3".to_string(),
                    quality: audio_quality_label(best),
                    size: best.filesize,
                });
                return items;
            }
        }
        // nothing usable as audio, fall through to the video path
    }

    let preference = QualityPreference::parse(quality);
    if let Some(best) = best_video_variant(&doc.formats, &preference) {
        if let Some(url) = &best.url {
            let ext = best.ext.as_deref().unwrap_or("mp4");
            items.push(MediaItem {
                kind: MediaKind::Video,
                url: url.clone(),
                title: title.to_string(),
                filename: build_filename(title, quality, ext),
                format: ext.to_string(),
                quality: video_quality_label(best),
                size: best.filesize,
            });
        }
    }

    let mut image_index = 0;
    for format in doc.formats.iter().filter(|f| f.is_image()) {
        if image_index == MAX_IMAGE_ITEMS {
            break;
        }
        let Some(url) = &format.url else { continue };
        image_index += 1;
        let ext = format.ext.as_deref().unwrap_or("jpg");
        let image_title = format!("{title} - Image {image_index}");
        items.push(MediaItem {
            kind: MediaKind::Image,
            url: url.clone(),
            filename: build_filename(&image_title, quality, ext),
            title: image_title,
            format: ext.to_string(),
            quality: image_quality_label(format),
            size: format.filesize,
        });
    }

    items
}

/// `quality` is the request-level string: "best" and "worst" add no
/// suffix, anything else is appended so capped downloads stay
/// distinguishable on disk.
fn build_filename(title: &str, quality: &str, ext: &str) -> String {
    let base = if quality == "best" || quality == "worst" {
        title.to_string()
    } else {
        format!("{title}_{quality}")
    };
    format!("{}.{}", sanitize_filename(&base), ext)
}

fn audio_quality_label(format: &MediaFormat) -> String {
    match format.abr {
        Some(abr) if abr.fract() == 0.0 => format!("{}kbps", abr as u64),
        Some(abr) => format!("{abr}kbps"),
        None => "unknownkbps".to_string(),
    }
}

fn video_quality_label(format: &MediaFormat) -> String {
    if let Some(height) = format.height {
        if height > 0 {
            return format!("{height}p");
        }
    }
    if let Some(note) = format.format_note.as_deref() {
        if !note.is_empty() {
            return note.to_string();
        }
    }
    if let Some(id) = format.format_id.as_deref() {
        if !id.is_empty() {
            return id.to_string();
        }
    }
    "unknown".to_string()
}

fn image_quality_label(format: &MediaFormat) -> String {
    match (format.width, format.height) {
        (Some(width), Some(height)) => format!("{width}x{height}"),
        _ => "unknown".to_string(),
    }
}
