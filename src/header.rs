use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Local};
use regex::Regex;

use encoded_word;

/// Lower-cased header name to decoded header value.
pub type HeaderMap = HashMap<String, String>;

/// Format used for `Message::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a raw header block into a `HeaderMap`.
///
/// Folded lines are joined to the header they continue. Lines without a
/// colon are skipped. When a header appears more than once, the last one
/// wins.
pub fn decode(raw: &[u8]) -> HeaderMap {
    let raw = String::from_utf8_lossy(raw);
    let mut headers = HeaderMap::new();

    for line in unfold(&raw) {
        let mut parts = line.splitn(2, ':');
        let name = parts.next().unwrap_or("").trim();
        let value = match parts.next() {
            Some(value) if !name.is_empty() => value.trim(),
            _ => {
                debug!("Skipping malformed header line: {:?}", line);
                continue;
            }
        };
        headers.insert(name.to_lowercase(), encoded_word::decode_to_string(value));
    }
    headers
}

fn unfold(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.split('\n') {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let continues = line.starts_with(' ') || line.starts_with('\t');
        match lines.last_mut() {
            Some(previous) if continues => {
                previous.push(' ');
                previous.push_str(line.trim_start());
            }
            _ => lines.push(line.to_string()),
        }
    }
    lines
}

/// The bare address of a `From` value: whatever is between the angle
/// brackets, or the value unchanged if there are none.
pub fn format_from(from: &str) -> String {
    lazy_static! {
        static ref ANGLE_ADDR: Regex = Regex::new(r"(?s)<(.+)>").unwrap();
    }
    match ANGLE_ADDR.captures(from) {
        Some(cap) => cap[1].to_string(),
        None => from.to_string(),
    }
}

/// Timestamp of a `Received` value, taken from after its last `;`.
///
/// Returns an empty string when there is no parseable date.
pub fn received_date(received: &str) -> String {
    let stamp = received.rsplit(';').next().unwrap_or("").trim();
    if stamp.is_empty() {
        return String::new();
    }
    match parse_date(stamp) {
        Some(date) => date.with_timezone(&Local).format(DATE_FORMAT).to_string(),
        None => {
            debug!("Unparseable Received date: {:?}", stamp);
            String::new()
        }
    }
}

fn parse_date(stamp: &str) -> Option<DateTime<FixedOffset>> {
    lazy_static! {
        static ref TRAILING_COMMENT: Regex = Regex::new(r"\s*\([^)]*\)\s*$").unwrap();
        static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    }
    let stamp = TRAILING_COMMENT.replace(stamp, "");
    let stamp = WHITESPACE.replace_all(&stamp, " ");
    DateTime::parse_from_rfc2822(&stamp)
        .or_else(|_| DateTime::parse_from_str(&stamp, "%d %b %Y %H:%M:%S %z"))
        .ok()
}
