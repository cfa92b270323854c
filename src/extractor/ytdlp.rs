//! yt-dlp wrapper for metadata extraction
//!
//! Invokes the yt-dlp binary in metadata-only mode and parses its single
//! JSON document. The binary is located once at startup; every request is
//! one subprocess run under a wall-clock deadline.

use crate::extractor::models::MediaMetadata;
use crate::extractor::traits::MetadataExtractor;
use crate::utils::config::{Settings, DESKTOP_USER_AGENT};
use crate::utils::error::VidgateError;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Invocation profile. The degraded one is only ever used as a retry after
/// a bot-verification wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractProfile {
    Standard,
    Degraded,
}

/// Subprocess-backed extractor.
pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
    settings: Settings,
}

impl YtDlpExtractor {
    /// Resolve the binary and capture the invocation knobs.
    ///
    /// An explicit path in the settings is trusted as-is; otherwise the
    /// PATH is searched, then common install locations.
    pub fn new(settings: &Settings) -> Result<Self> {
        let ytdlp_path = match settings.ytdlp_path.clone().or_else(find_ytdlp) {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                path
            }
            None => {
                error!("yt-dlp not found anywhere");
                return Err(VidgateError::YtDlpNotFound.into());
            }
        };

        Ok(Self {
            ytdlp_path,
            settings: settings.clone(),
        })
    }

    /// Run one extraction attempt under the given profile.
    pub async fn extract_with_profile(
        &self,
        url: &str,
        profile: ExtractProfile,
    ) -> Result<MediaMetadata> {
        debug!("Extracting media info for {url} ({profile:?} profile)");

        let args = self.build_args(url, profile);
        // The deadline below drops this future; the child must not outlive it.
        let invocation = Command::new(&self.ytdlp_path)
            .args(&args)
            .kill_on_drop(true)
            .output();
        let output = timeout(
            Duration::from_secs(self.settings.extraction_timeout),
            invocation,
        )
        .await
        .map_err(|_| VidgateError::ExtractionTimeout(self.settings.extraction_timeout))?
        .map_err(VidgateError::IoError)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_bot_detection(&stderr) {
                warn!("Bot verification wall while extracting {url}");
                return Err(VidgateError::BotDetected(stderr.trim().to_string()).into());
            }
            error!("yt-dlp extraction failed for {url}: {}", stderr.trim());
            return Err(VidgateError::from_stderr(&stderr).into());
        }

        let doc: MediaMetadata =
            serde_json::from_slice(&output.stdout).map_err(VidgateError::SerializationError)?;
        Ok(doc)
    }

    fn build_args(&self, url: &str, profile: ExtractProfile) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--dump-single-json".into(),
            "--skip-download".into(),
            "--no-warnings".into(),
            "--quiet".into(),
        ];

        if self.settings.hardened || profile == ExtractProfile::Degraded {
            args.push("--user-agent".into());
            args.push(DESKTOP_USER_AGENT.into());
            args.push("--socket-timeout".into());
            args.push(self.settings.socket_timeout.to_string());
            args.push("--retries".into());
            args.push(self.settings.retries.to_string());
            args.push("--fragment-retries".into());
            args.push(self.settings.fragment_retries.to_string());
            args.push("--no-check-certificates".into());
        }

        if profile == ExtractProfile::Degraded {
            // Player clients that are less likely to hit the wall, no
            // HLS/DASH manifest resolution, capped resolution.
            args.push("--extractor-args".into());
            args.push("youtube:player_client=android,web".into());
            args.push("--extractor-args".into());
            args.push("youtube:skip=hls,dash".into());
            args.push("--format".into());
            args.push("best[height<=480]".into());
        }

        args.push(url.into());
        args
    }

    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }
}

#[async_trait]
impl MetadataExtractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract(&self, url: &str) -> Result<MediaMetadata> {
        self.extract_with_profile(url, ExtractProfile::Standard)
            .await
    }
}

/// Signatures yt-dlp emits when a platform demands human verification.
pub fn is_bot_detection(stderr: &str) -> bool {
    let lowered = stderr.to_lowercase();
    lowered.contains("sign in to confirm")
        || lowered.contains("not a bot")
        || lowered.contains("captcha")
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find the yt-dlp binary: PATH first, then common install locations.
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        debug!("Using yt-dlp from PATH: {}", path.display());
        return Some(path);
    }

    find_in_common_paths()
}

fn find_in_common_paths() -> Option<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("/usr/local/bin/yt-dlp"),
        PathBuf::from("/usr/bin/yt-dlp"),
        // macOS Homebrew (Apple Silicon)
        PathBuf::from("/opt/homebrew/bin/yt-dlp"),
    ];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".local").join("bin").join("yt-dlp"));
    }

    candidates.into_iter().find(|path| is_executable(path))
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
