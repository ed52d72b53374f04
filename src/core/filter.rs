// RouterLens - core/filter.rs
//
// Composable filter engine for parsed log records.
// All active criteria are AND-combined; absent criteria are skipped.
// Core layer: pure logic, no I/O dependencies.

use crate::core::model::{LogRecord, Severity, Topic};
use crate::util::constants::{FILTER_ALL, TIME_BOUND_FORMATS};
use crate::util::error::FilterError;
use chrono::NaiveDateTime;

/// Complete filter state. Every field is optional; unset fields do not
/// exclude anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Start of time range (inclusive). None = no lower bound.
    pub time_start: Option<NaiveDateTime>,

    /// End of time range (inclusive). None = no upper bound.
    pub time_end: Option<NaiveDateTime>,

    /// Exact topic. None = all topics.
    pub topic: Option<Topic>,

    /// Exact severity. None = all severities.
    pub severity: Option<Severity>,

    /// Exact interface name. None, empty, or "All" = no filter.
    pub interface: Option<String>,

    /// Case-insensitive substring of `raw_log` or `message`. Empty = no filter.
    pub keyword: String,

    /// Substring of the rendered IP list. Empty = no filter.
    pub ip_address: String,

    /// Substring of the rendered MAC list. Empty = no filter.
    pub mac_address: String,
}

impl FilterCriteria {
    /// Returns true if no criteria are active.
    pub fn is_empty(&self) -> bool {
        self.time_start.is_none()
            && self.time_end.is_none()
            && self.topic.is_none()
            && self.severity.is_none()
            && self.active_interface().is_none()
            && self.keyword.is_empty()
            && self.ip_address.is_empty()
            && self.mac_address.is_empty()
    }

    fn active_interface(&self) -> Option<&str> {
        self.interface
            .as_deref()
            .filter(|iface| !is_all(iface))
    }
}

/// True for the empty string and the "All" sentinel.
fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL)
}

/// Parse a topic selection. Empty or "All" selects every topic.
pub fn parse_topic(value: &str) -> Result<Option<Topic>, FilterError> {
    if is_all(value) {
        return Ok(None);
    }
    Topic::from_label(value)
        .map(Some)
        .ok_or_else(|| FilterError::UnknownTopic {
            value: value.to_string(),
        })
}

/// Parse a severity selection. Empty or "All" selects every severity.
pub fn parse_severity(value: &str) -> Result<Option<Severity>, FilterError> {
    if is_all(value) {
        return Ok(None);
    }
    Severity::from_label(value)
        .map(Some)
        .ok_or_else(|| FilterError::UnknownSeverity {
            value: value.to_string(),
        })
}

/// Parse a user-supplied time bound using the accepted formats in order.
pub fn parse_time_bound(value: &str) -> Result<NaiveDateTime, FilterError> {
    let trimmed = value.trim();
    TIME_BOUND_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| FilterError::InvalidTimeBound {
            value: value.to_string(),
        })
}

/// Apply criteria to records, returning the survivors in input order.
///
/// Accepts anything that yields record references, so filtered views can
/// be filtered again without copying.
pub fn filter_records<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a LogRecord>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    if criteria.is_empty() {
        return records.into_iter().collect();
    }

    let keyword_lower = criteria.keyword.to_lowercase();

    let matched: Vec<&LogRecord> = records
        .into_iter()
        .filter(|record| matches_all(record, criteria, &keyword_lower))
        .collect();

    tracing::debug!(matched = matched.len(), "Filter applied");
    matched
}

/// Check if a single record matches all active criteria.
fn matches_all(record: &LogRecord, criteria: &FilterCriteria, keyword_lower: &str) -> bool {
    // Time range: records without a timestamp are excluded once any bound is set
    if let Some(ref start) = criteria.time_start {
        match record.timestamp {
            Some(ts) if ts < *start => return false,
            None => return false,
            _ => {}
        }
    }
    if let Some(ref end) = criteria.time_end {
        match record.timestamp {
            Some(ts) if ts > *end => return false,
            None => return false,
            _ => {}
        }
    }

    if let Some(topic) = criteria.topic {
        if record.topic != topic {
            return false;
        }
    }

    if let Some(severity) = criteria.severity {
        if record.severity != severity {
            return false;
        }
    }

    if let Some(iface) = criteria.active_interface() {
        if record.interface.as_deref() != Some(iface) {
            return false;
        }
    }

    if !keyword_lower.is_empty()
        && !record.raw_log.to_lowercase().contains(keyword_lower)
        && !record.message.to_lowercase().contains(keyword_lower)
    {
        return false;
    }

    if !criteria.ip_address.is_empty() && !record.ip_list().contains(&criteria.ip_address) {
        return false;
    }

    if !criteria.mac_address.is_empty() && !record.mac_list().contains(&criteria.mac_address) {
        return false;
    }

    true
}
