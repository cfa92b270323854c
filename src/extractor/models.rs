//! Data structures for the extracted metadata document
//!
//! yt-dlp's JSON output is loosely typed: fields come and go per platform,
//! numbers arrive as integers, floats, or strings, and thumbnails switch
//! between bare URLs and objects. Everything here deserializes leniently;
//! downstream code reads through accessors that apply the documented
//! defaults instead of touching raw JSON.

use serde::{Deserialize, Deserializer};

/// One metadata document, as dumped by `yt-dlp --dump-single-json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<DurationValue>,
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub thumbnails: Vec<ThumbnailEntry>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub creator: Option<String>,
    pub upload_date: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub description: Option<String>,
    pub extractor_key: Option<String>,
    /// `"playlist"` when the URL resolved to a playlist container.
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    /// Direct URL on single-variant documents that carry no format list.
    pub url: Option<String>,
    #[serde(default)]
    pub formats: Vec<MediaFormat>,
    /// Set only on synthesized placeholder documents, never parsed.
    #[serde(skip)]
    pub partial_error: Option<String>,
}

impl MediaMetadata {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    /// First non-empty of uploader / channel / creator.
    pub fn uploader_name(&self) -> &str {
        [&self.uploader, &self.channel, &self.creator]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .find(|s| !s.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn is_playlist(&self) -> bool {
        self.kind.as_deref() == Some("playlist")
    }

    /// All thumbnail URLs, deduplicated, first-seen order preserved.
    pub fn thumbnail_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for entry in &self.thumbnails {
            if let Some(url) = entry.url() {
                if !urls.iter().any(|seen| seen == url) {
                    urls.push(url.to_string());
                }
            }
        }
        urls
    }

    /// The document's own thumbnail, else the first list entry.
    pub fn primary_thumbnail(&self) -> Option<String> {
        self.thumbnail
            .clone()
            .or_else(|| self.thumbnail_urls().into_iter().next())
    }

    pub fn duration_seconds(&self) -> Option<u64> {
        self.duration.as_ref().and_then(DurationValue::seconds)
    }
}

/// Duration as emitted by extractors: a number, or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(f64),
    Text(String),
}

impl DurationValue {
    /// Whole seconds when the value coerces cleanly, `None` otherwise.
    pub fn seconds(&self) -> Option<u64> {
        let raw = match self {
            DurationValue::Seconds(s) => Some(*s),
            DurationValue::Text(t) => t.trim().parse::<f64>().ok(),
        }?;
        if raw.is_finite() && raw >= 0.0 {
            Some(raw as u64)
        } else {
            None
        }
    }

    /// Zero and the empty string count as "no duration", not as errors.
    pub fn is_falsy(&self) -> bool {
        match self {
            DurationValue::Seconds(s) => *s == 0.0,
            DurationValue::Text(t) => t.is_empty(),
        }
    }
}

/// Thumbnail list entries are bare URL strings on some platforms and
/// objects with a `url` key on others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ThumbnailEntry {
    Url(String),
    Entry {
        #[serde(default)]
        url: Option<String>,
    },
    Other(serde_json::Value),
}

impl ThumbnailEntry {
    pub fn url(&self) -> Option<&str> {
        match self {
            ThumbnailEntry::Url(url) => Some(url),
            ThumbnailEntry::Entry { url } => url.as_deref(),
            ThumbnailEntry::Other(_) => None,
        }
    }
}

/// One candidate encoding of the media.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaFormat {
    pub format_id: Option<String>,
    pub ext: Option<String>,
    pub url: Option<String>,
    /// Literal "none" means the stream is absent; any other value, or no
    /// value at all, means present or unknown.
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Audio bitrate in kbps.
    pub abr: Option<f64>,
    /// yt-dlp's own numeric quality preference, echoed in format listings.
    pub quality: Option<f32>,
    pub format_note: Option<String>,
    /// Free-text label, e.g. "137 - 1920x1080 (1080p)" or "Image 3".
    pub format: Option<String>,
    #[serde(default, deserialize_with = "de_opt_bytes")]
    pub filesize: Option<u64>,
}

impl MediaFormat {
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none")
    }

    pub fn has_audio(&self) -> bool {
        self.acodec.as_deref() != Some("none")
    }

    pub fn is_pure_audio(&self) -> bool {
        self.has_audio() && self.vcodec.as_deref() == Some("none")
    }

    /// Image renditions: labeled "image" or carrying a picture extension.
    pub fn is_image(&self) -> bool {
        let labeled = self
            .format
            .as_deref()
            .map(|label| label.to_lowercase().contains("image"))
            .unwrap_or(false);
        labeled || matches!(self.ext.as_deref(), Some("jpg" | "jpeg" | "png" | "webp"))
    }

    pub fn height_or_zero(&self) -> u32 {
        self.height.unwrap_or(0)
    }

    pub fn abr_or_zero(&self) -> f64 {
        self.abr.unwrap_or(0.0)
    }
}

/// filesize is an integer in practice, but approximate float sizes show up
/// in the wild; accept both.
fn de_opt_bytes<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_document_parse() {
        let json = r#"{
            "title": "Test Video",
            "duration": "123.5",
            "thumbnails": [
                "https://example.com/a.jpg",
                {"url": "https://example.com/b.jpg", "width": 320},
                {"id": "no-url-here"},
                null
            ],
            "channel": "Chan",
            "_type": "video",
            "formats": [{"format_id": "18", "ext": "mp4", "filesize": 1024.7}]
        }"#;
        let doc: MediaMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(doc.display_title(), "Test Video");
        assert_eq!(doc.duration_seconds(), Some(123));
        assert_eq!(doc.uploader_name(), "Chan");
        assert!(!doc.is_playlist());
        assert_eq!(
            doc.thumbnail_urls(),
            vec!["https://example.com/a.jpg", "https://example.com/b.jpg"]
        );
        assert_eq!(doc.formats[0].filesize, Some(1024));
    }

    #[test]
    fn test_empty_document_defaults() {
        let doc: MediaMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.display_title(), "Unknown");
        assert_eq!(doc.uploader_name(), "Unknown");
        assert!(doc.formats.is_empty());
        assert_eq!(doc.duration_seconds(), None);
        assert_eq!(doc.primary_thumbnail(), None);
    }

    #[test]
    fn test_uploader_skips_empty_strings() {
        let doc: MediaMetadata = serde_json::from_str(
            r#"{"uploader": "", "channel": "", "creator": "Real Name"}"#,
        )
        .unwrap();
        assert_eq!(doc.uploader_name(), "Real Name");
    }

    #[test]
    fn test_thumbnails_deduplicate_in_order() {
        let doc: MediaMetadata = serde_json::from_str(
            r#"{"thumbnails": ["https://t/1", "https://t/2", "https://t/1"]}"#,
        )
        .unwrap();
        assert_eq!(doc.thumbnail_urls(), vec!["https://t/1", "https://t/2"]);
    }

    #[test]
    fn test_codec_none_sentinel() {
        let muted: MediaFormat = serde_json::from_str(r#"{"vcodec": "avc1", "acodec": "none"}"#).unwrap();
        assert!(muted.has_video());
        assert!(!muted.has_audio());

        let untagged: MediaFormat = serde_json::from_str("{}").unwrap();
        assert!(untagged.has_video());
        assert!(untagged.has_audio());
        assert!(!untagged.is_pure_audio());
    }

    #[test]
    fn test_image_detection() {
        let by_label: MediaFormat =
            serde_json::from_str(r#"{"format": "Storyboard Image", "ext": "mhtml"}"#).unwrap();
        assert!(by_label.is_image());

        let by_ext: MediaFormat = serde_json::from_str(r#"{"ext": "webp"}"#).unwrap();
        assert!(by_ext.is_image());

        let neither: MediaFormat = serde_json::from_str(r#"{"ext": "mp4"}"#).unwrap();
        assert!(!neither.is_image());
    }

    #[test]
    fn test_duration_value_coercion() {
        assert_eq!(DurationValue::Seconds(90.9).seconds(), Some(90));
        assert_eq!(DurationValue::Text(" 42 ".into()).seconds(), Some(42));
        assert_eq!(DurationValue::Text("bad".into()).seconds(), None);
        assert!(DurationValue::Seconds(0.0).is_falsy());
        assert!(DurationValue::Text(String::new()).is_falsy());
        assert!(!DurationValue::Text("0".into()).is_falsy());
    }
}
