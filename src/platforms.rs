//! Supported-platform gate and catalog

use serde::Serialize;
use url::Url;

/// Domains the service will hand to the extractor. Matching is
/// substring-based on the URL host, so subdomains (m.youtube.com,
/// old.reddit.com) pass without being listed individually.
pub const SUPPORTED_DOMAINS: [&str; 11] = [
    "youtube.com",
    "youtu.be",
    "tiktok.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "facebook.com",
    "twitch.tv",
    "vimeo.com",
    "dailymotion.com",
    "reddit.com",
];

/// Admission gate run before any extraction work.
///
/// Unparseable URLs and URLs without a host are rejected rather than
/// passed through to the subprocess.
pub fn is_supported(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    SUPPORTED_DOMAINS.iter().any(|domain| host.contains(domain))
}

/// One row of the public platform catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Platform {
    pub name: &'static str,
    pub domain: &'static str,
    pub supports_audio: bool,
}

/// What `/api/platforms` advertises. Alias domains (youtu.be, x.com)
/// stay out of the catalog but are accepted by the gate.
pub const PLATFORM_CATALOG: [Platform; 9] = [
    Platform { name: "YouTube", domain: "youtube.com", supports_audio: true },
    Platform { name: "TikTok", domain: "tiktok.com", supports_audio: true },
    Platform { name: "Instagram", domain: "instagram.com", supports_audio: true },
    Platform { name: "Twitter/X", domain: "twitter.com", supports_audio: true },
    Platform { name: "Facebook", domain: "facebook.com", supports_audio: true },
    Platform { name: "Twitch", domain: "twitch.tv", supports_audio: true },
    Platform { name: "Vimeo", domain: "vimeo.com", supports_audio: true },
    Platform { name: "Dailymotion", domain: "dailymotion.com", supports_audio: true },
    Platform { name: "Reddit", domain: "reddit.com", supports_audio: true },
];
