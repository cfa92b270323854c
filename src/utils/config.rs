//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Desktop UA sent with hardened extraction attempts. Some platforms serve
/// bot walls to the default python-urllib agent string.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Explicit yt-dlp binary path (skips discovery)
    pub ytdlp_path: Option<PathBuf>,

    /// Wall-clock limit for one yt-dlp invocation (seconds)
    pub extraction_timeout: u64,

    /// Pass anti-blocking flags (UA override, retries, socket timeout)
    /// on every attempt, not just the degraded one
    pub hardened: bool,

    /// Socket timeout forwarded to yt-dlp (seconds)
    pub socket_timeout: u64,

    /// Whole-request retries forwarded to yt-dlp
    pub retries: u32,

    /// Fragment retries forwarded to yt-dlp
    pub fragment_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            ytdlp_path: None,
            extraction_timeout: 60,
            hardened: true,
            socket_timeout: 15,
            retries: 2,
            fragment_retries: 2,
        }
    }
}
