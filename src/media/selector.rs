//! Variant selection under a quality preference
//!
//! Pure functions over one parsed document. yt-dlp gives no ordering
//! guarantee on its format list, so every pick here is an explicit scan
//! with first-encountered-wins tie-breaks.

use crate::extractor::models::MediaFormat;

/// Parsed form of the request's free-text quality field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityPreference {
    Best,
    Worst,
    /// Numeric string, e.g. "720": highest variant not exceeding the cap.
    /// Surrounding whitespace is tolerated; the keywords are exact.
    Cap(u32),
    /// Anything unrecognized: no filtering, original order decides.
    Passthrough,
}

impl QualityPreference {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "best" => QualityPreference::Best,
            "worst" => QualityPreference::Worst,
            other => match other.trim().parse::<u32>() {
                Ok(cap) => QualityPreference::Cap(cap),
                Err(_) => QualityPreference::Passthrough,
            },
        }
    }
}

/// Pick the single URL to hand back for a document.
///
/// An empty format list falls back to the document's direct URL. With
/// `audio_only` set, audio candidates are tried first and the video path
/// only runs when there are none at all. The chosen variant's URL is
/// returned verbatim; a winner without a URL yields `None` rather than
/// silently switching to another variant.
pub fn select_variant(
    formats: &[MediaFormat],
    direct_url: Option<&str>,
    quality: &str,
    audio_only: bool,
) -> Option<String> {
    if formats.is_empty() {
        return direct_url.map(str::to_string);
    }

    if audio_only {
        if let Some(best) = best_audio_variant(formats) {
            return best.url.clone();
        }
    }

    let preference = QualityPreference::parse(quality);
    match best_video_variant(formats, &preference) {
        Some(chosen) => chosen.url.clone(),
        None => direct_url.map(str::to_string),
    }
}

/// Highest-bitrate audio candidate, if any.
///
/// Pure audio variants (video stream explicitly absent) are preferred;
/// when none exist, anything with an audio stream qualifies. Missing
/// bitrates rank as zero.
pub fn best_audio_variant(formats: &[MediaFormat]) -> Option<&MediaFormat> {
    let pure: Vec<&MediaFormat> = formats.iter().filter(|f| f.is_pure_audio()).collect();
    let candidates = if pure.is_empty() {
        formats.iter().filter(|f| f.has_audio()).collect()
    } else {
        pure
    };
    highest_abr(&candidates)
}

/// Best video candidate under the given preference, if any.
///
/// Candidates are the variants with a video stream; when no codec tags
/// survived extraction, any variant carrying a URL qualifies instead.
/// Missing heights rank as zero. A cap that excludes every candidate
/// degrades to the unfiltered set instead of selecting nothing.
pub fn best_video_variant<'a>(
    formats: &'a [MediaFormat],
    preference: &QualityPreference,
) -> Option<&'a MediaFormat> {
    let with_video: Vec<&MediaFormat> = formats.iter().filter(|f| f.has_video()).collect();
    let candidates = if with_video.is_empty() {
        formats.iter().filter(|f| f.url.is_some()).collect()
    } else {
        with_video
    };

    match preference {
        QualityPreference::Best => highest_height(&candidates),
        QualityPreference::Worst => lowest_height(&candidates),
        QualityPreference::Cap(cap) => {
            let capped: Vec<&MediaFormat> = candidates
                .iter()
                .copied()
                .filter(|f| f.height_or_zero() <= *cap)
                .collect();
            if capped.is_empty() {
                highest_height(&candidates)
            } else {
                highest_height(&capped)
            }
        }
        QualityPreference::Passthrough => candidates.first().copied(),
    }
}

fn highest_height<'a>(candidates: &[&'a MediaFormat]) -> Option<&'a MediaFormat> {
    let mut best: Option<&'a MediaFormat> = None;
    for &f in candidates {
        let better = match best {
            None => true,
            Some(current) => f.height_or_zero() > current.height_or_zero(),
        };
        if better {
            best = Some(f);
        }
    }
    best
}

fn lowest_height<'a>(candidates: &[&'a MediaFormat]) -> Option<&'a MediaFormat> {
    let mut worst: Option<&'a MediaFormat> = None;
    for &f in candidates {
        let lower = match worst {
            None => true,
            Some(current) => f.height_or_zero() < current.height_or_zero(),
        };
        if lower {
            worst = Some(f);
        }
    }
    worst
}

fn highest_abr<'a>(candidates: &[&'a MediaFormat]) -> Option<&'a MediaFormat> {
    let mut best: Option<&'a MediaFormat> = None;
    for &f in candidates {
        let better = match best {
            None => true,
            Some(current) => f.abr_or_zero() > current.abr_or_zero(),
        };
        if better {
            best = Some(f);
        }
    }
    best
}
