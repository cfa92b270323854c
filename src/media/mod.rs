//! Normalization of extracted documents into the public API schema

pub mod items;
pub mod response;
pub mod selector;

pub use items::{extract_media_items, MediaItem, MediaKind};
pub use response::{FormatSummary, ResponseDetail, VideoInfo};
pub use selector::{select_variant, QualityPreference};
