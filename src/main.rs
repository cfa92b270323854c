//! Vidgate - HTTP metadata gateway for yt-dlp
//!
//! A thin HTTP facade over yt-dlp: accepts a media page URL, runs the
//! extractor in metadata-only mode, and serves a normalized description of
//! the media (or a direct playable URL) as JSON.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use tracing::{info, warn};
use vidgate::extractor::{FallbackExtractor, YtDlpExtractor};
use vidgate::server::{self, AppState};
use vidgate::utils::Settings;

#[derive(Parser)]
#[command(name = "vidgate", version, about = "HTTP metadata gateway for yt-dlp")]
struct Args {
    /// Address to bind the HTTP server on
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// Explicit path to the yt-dlp binary (PATH and common install
    /// locations are searched otherwise)
    #[arg(long)]
    ytdlp_path: Option<PathBuf>,

    /// Wall-clock seconds allowed for one extraction subprocess
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Drop the hardened yt-dlp flag set (custom user agent, retries, socket timeout)
    #[arg(long)]
    no_hardened: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let settings = Settings {
        bind_addr: args.bind,
        ytdlp_path: args.ytdlp_path,
        extraction_timeout: args.timeout,
        hardened: !args.no_hardened,
        ..Settings::default()
    };

    let extractor = match YtDlpExtractor::new(&settings) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("ERROR: yt-dlp not found in PATH or common locations");
            eprintln!("Please install yt-dlp:");
            eprintln!("  pip install yt-dlp");
            eprintln!("  or: brew install yt-dlp");
            eprintln!("  or visit: https://github.com/yt-dlp/yt-dlp");
            return Err(e);
        }
    };
    report_ytdlp_version(&extractor);

    let state = AppState::new(Arc::new(FallbackExtractor::new(extractor)));
    server::serve(state, &settings.bind_addr).await
}

/// Probe the resolved binary once so a broken install shows up at startup
/// instead of on the first request.
fn report_ytdlp_version(extractor: &YtDlpExtractor) {
    let path = extractor.ytdlp_path();
    match Command::new(path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout);
            info!("yt-dlp {} at {}", version.trim(), path.display());
        }
        _ => {
            warn!(
                "yt-dlp at {} did not answer --version; extraction may fail",
                path.display()
            );
        }
    }
}
