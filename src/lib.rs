//! Vidgate library

pub mod extractor;
pub mod media;
pub mod platforms;
pub mod server;
pub mod utils;

// Re-export main types for easier use
pub use extractor::{
    FallbackExtractor, MediaFormat, MediaMetadata, MetadataExtractor, YtDlpExtractor,
};
pub use media::{select_variant, MediaItem, QualityPreference, VideoInfo};
pub use platforms::{is_supported, PLATFORM_CATALOG};
pub use server::{build_router, AppState};
pub use utils::{Settings, VidgateError};
