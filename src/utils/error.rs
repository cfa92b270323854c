//! Error handling for Vidgate

use thiserror::Error;

/// Main error type for Vidgate
#[derive(Debug, Error)]
pub enum VidgateError {
    #[error("yt-dlp not found. Please install yt-dlp")]
    YtDlpNotFound,

    /// Display text is the exact detail string the admission gate returns.
    #[error("Unsupported platform")]
    UnsupportedPlatform,

    #[error("Failed to extract video info: {0}")]
    ExtractionError(String),

    #[error("Video format error: {0}. This video may have limited format options")]
    FormatError(String),

    #[error("Bot verification wall: {0}")]
    BotDetected(String),

    #[error("Extraction timed out after {0} seconds")]
    ExtractionTimeout(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl VidgateError {
    /// Classify raw yt-dlp stderr into the matching error variant.
    ///
    /// Bot-verification walls are recognized upstream (they trigger the
    /// degraded retry, not an error); this handles everything else.
    pub fn from_stderr(stderr: &str) -> Self {
        let lowered = stderr.to_lowercase();
        if lowered.contains("format code")
            || lowered.contains("invalid literal")
            || lowered.contains("requested format is not available")
        {
            VidgateError::FormatError(last_error_line(stderr))
        } else {
            VidgateError::ExtractionError(last_error_line(stderr))
        }
    }
}

/// yt-dlp prefixes its fatal line with "ERROR:"; prefer that over the
/// whole stderr dump, which can include tracebacks.
fn last_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|line| line.contains("ERROR"))
        .unwrap_or_else(|| stderr.lines().last().unwrap_or("unknown error"))
        .trim()
        .to_string()
}
