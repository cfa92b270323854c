//! Bot-detection fallback chain
//!
//! Extraction runs as an ordered list of strategies: the standard profile,
//! then one degraded retry when a bot-verification wall was hit, then a
//! synthesized placeholder document. The last step cannot fail, so a bot
//! wall alone never surfaces to callers as an error, only as a partial
//! document flagged through `partial_error`.

use crate::extractor::models::MediaMetadata;
use crate::extractor::traits::MetadataExtractor;
use crate::extractor::ytdlp::{ExtractProfile, YtDlpExtractor};
use crate::utils::error::VidgateError;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};
use url::Url;

pub struct FallbackExtractor {
    inner: YtDlpExtractor,
}

impl FallbackExtractor {
    pub fn new(inner: YtDlpExtractor) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl MetadataExtractor for FallbackExtractor {
    fn id(&self) -> &'static str {
        "yt-dlp-chain"
    }

    async fn extract(&self, url: &str) -> Result<MediaMetadata> {
        match self
            .inner
            .extract_with_profile(url, ExtractProfile::Standard)
            .await
        {
            Ok(doc) => Ok(doc),
            Err(err) if !is_bot_detected(&err) => Err(err),
            Err(_) => {
                info!("Retrying {url} with the degraded profile");
                match self
                    .inner
                    .extract_with_profile(url, ExtractProfile::Degraded)
                    .await
                {
                    Ok(doc) => Ok(doc),
                    Err(retry_err) => {
                        warn!(
                            "Degraded attempt for {url} failed too ({retry_err}), \
                             synthesizing placeholder document"
                        );
                        Ok(placeholder_document(url))
                    }
                }
            }
        }
    }
}

fn is_bot_detected(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<VidgateError>(),
        Some(VidgateError::BotDetected(_))
    )
}

/// Best-effort document for a URL every real attempt was blocked on.
///
/// Carries a constructed title, a thumbnail recovered from the video ID
/// where the platform makes that predictable, no formats, and the
/// partial-info sentinel the response layer exposes as `_error`.
pub fn placeholder_document(url: &str) -> MediaMetadata {
    let parsed = Url::parse(url).ok();
    let host = parsed
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or("the source")
        .to_string();

    let mut doc = MediaMetadata::default();
    match parsed.as_ref().and_then(youtube_video_id) {
        Some(id) => {
            doc.title = Some(format!("YouTube Video {id}"));
            doc.thumbnail = Some(format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"));
        }
        None => {
            doc.title = Some(format!("Video from {host}"));
        }
    }
    doc.partial_error = Some(
        "Bot verification blocked extraction; returning limited information. \
         The video may still be playable in a browser."
            .to_string(),
    );
    doc
}

/// The `v` query parameter on youtube.com URLs, or the leading path
/// segment on youtu.be short links.
fn youtube_video_id(parsed: &Url) -> Option<String> {
    let host = parsed.host_str()?.to_lowercase();
    if host.contains("youtu.be") {
        return parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string);
    }
    if host.contains("youtube.com") {
        return parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_from_watch_url() {
        let doc = placeholder_document("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42");
        assert_eq!(doc.display_title(), "YouTube Video dQw4w9WgXcQ");
        assert_eq!(
            doc.thumbnail.as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
        assert!(doc.formats.is_empty());
        assert!(doc.partial_error.is_some());
    }

    #[test]
    fn test_placeholder_from_short_link() {
        let doc = placeholder_document("https://youtu.be/abc123XYZ_-");
        assert_eq!(doc.display_title(), "YouTube Video abc123XYZ_-");
    }

    #[test]
    fn test_placeholder_for_other_platforms_skips_thumbnail() {
        let doc = placeholder_document("https://vimeo.com/12345");
        assert_eq!(doc.display_title(), "Video from vimeo.com");
        assert!(doc.thumbnail.is_none());
    }

    #[test]
    fn test_placeholder_for_garbage_url() {
        let doc = placeholder_document("not a url");
        assert_eq!(doc.display_title(), "Video from the source");
        assert!(doc.partial_error.is_some());
    }

    #[test]
    fn test_bot_error_downcast() {
        let err: anyhow::Error = VidgateError::BotDetected("wall".to_string()).into();
        assert!(is_bot_detected(&err));

        let other: anyhow::Error = VidgateError::ExtractionError("x".to_string()).into();
        assert!(!is_bot_detected(&other));
    }
}
