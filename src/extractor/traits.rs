use crate::extractor::models::MediaMetadata;
use anyhow::Result;
use async_trait::async_trait;

/// Seam between the HTTP layer and whatever produces metadata documents.
///
/// The server only ever sees this trait, so handler tests can swap the
/// subprocess-backed extractor for a canned one.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Unique identifier, used in logs (e.g. "yt-dlp", "yt-dlp-chain").
    fn id(&self) -> &'static str;

    /// Extract the metadata document for one URL, without downloading.
    async fn extract(&self, url: &str) -> Result<MediaMetadata>;
}
