pub mod fallback;
pub mod models;
pub mod traits;
pub mod ytdlp;

pub use fallback::FallbackExtractor;
pub use models::{MediaFormat, MediaMetadata};
pub use traits::MetadataExtractor;
pub use ytdlp::YtDlpExtractor;
