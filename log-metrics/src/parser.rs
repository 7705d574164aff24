use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::AccessRecord;

// Record grammar: %h %l %u %t %m %U %s %b %T
// 127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] GET /api/v1/resource 200 1234 0.567
// Anchored prefix match only; trailing extra fields are allowed.
static RECORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\S+ \S+ \S+ \[[^\]]+\] (\S+) (\S+) (\d+) (\d+) ([\d.]+)").expect("valid pattern")
});

// First bracketed span anywhere in the line, e.g. [10/Oct/2023:13:55:36 +0000]
static BRACKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid pattern"));

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Parses one access-log line. Rejection is all-or-nothing: a line either
/// matches the full record grammar or contributes nothing. A malformed
/// timestamp never rejects the record; the record is kept with `timestamp`
/// set to `None`.
pub fn parse_line(line: &str) -> Option<AccessRecord> {
    let caps = RECORD_PATTERN.captures(line)?;
    let method = caps[1].to_string();
    let endpoint = caps[2].to_string();
    let status: u16 = caps[3].parse().ok()?;
    let response_size_bytes: u64 = caps[4].parse().ok()?;
    let seconds: f64 = caps[5].parse().ok()?;
    Some(AccessRecord {
        endpoint,
        method,
        status,
        response_size_bytes,
        // Fractional seconds to whole milliseconds, truncated toward zero.
        response_time_ms: (seconds * 1000.0) as u64,
        timestamp: extract_timestamp(line),
    })
}

// Second extraction pass, decoupled from the record grammar: take the first
// whitespace-delimited token inside the first bracketed span and drop the
// trailing offset token.
fn extract_timestamp(line: &str) -> Option<NaiveDateTime> {
    let inner = BRACKET_PATTERN.captures(line)?.get(1)?.as_str();
    let token = inner.split_whitespace().next()?;
    NaiveDateTime::parse_from_str(token, TIMESTAMP_FORMAT).ok()
}
