//! Text shaping for filenames and display fields

use crate::extractor::models::DurationValue;

/// Characters that are invalid in filenames on at least one supported OS.
const RESERVED: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const MAX_FILENAME_CHARS: usize = 200;

/// Make a title safe to use as a filename base.
///
/// Reserved characters become `_`, whitespace runs collapse to one space,
/// the result is trimmed, `..` sequences become `_`, and the output is
/// capped at 200 characters. The extension is appended by the caller.
pub fn sanitize_filename(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect();
    let collapsed = collapse_whitespace(&replaced);
    // A single left-to-right pass cannot leave ".." behind: any adjacent
    // pair of dots is consumed when the scan reaches its first dot.
    let depathed = collapsed.trim().replace("..", "_");
    depathed.chars().take(MAX_FILENAME_CHARS).collect()
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Human-readable duration for a loosely-typed source value.
///
/// Absent, zero, and empty-string inputs yield `None`; numeric values and
/// numeric strings render as `HH:MM:SS` (hours omitted when zero); a value
/// that cannot be coerced renders as the literal `"Unknown"` rather than
/// failing the whole response.
pub fn format_duration(value: Option<&DurationValue>) -> Option<String> {
    let value = value?;
    if value.is_falsy() {
        return None;
    }
    match value.seconds() {
        Some(total) => Some(format_hms(total)),
        None => Some("Unknown".to_string()),
    }
}

fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Reformat an 8-digit `YYYYMMDD` stamp as `YYYY-MM-DD`.
///
/// Anything that does not slice cleanly is passed through unchanged.
pub fn format_upload_date(raw: &str) -> String {
    match (raw.get(0..4), raw.get(4..6), raw.get(6..8)) {
        (Some(year), Some(month), Some(day)) => format!("{year}-{month}-{day}"),
        _ => raw.to_string(),
    }
}
