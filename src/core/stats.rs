// RouterLens - core/stats.rs
//
// Grouped counts over a (possibly filtered) record table.
// Core layer: reads records by reference; derived date/hour values are
// computed per call and never written back into the records.

use crate::core::model::{LogRecord, Severity, Topic};
use crate::util::constants::DEFAULT_TOP_IP_COUNT;
use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Read-only summary of a record table.
///
/// Every mapping is empty for an empty table. Hours with no records are
/// absent from `hourly_counts`; filling the 24-hour range is a rendering
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of records aggregated.
    pub total_records: usize,

    /// Number of aggregated records that carry a timestamp.
    pub timestamped_records: usize,

    pub topic_counts: BTreeMap<Topic, usize>,
    pub severity_counts: BTreeMap<Severity, usize>,

    /// Counts per interface name. Records without an interface are not counted.
    pub interface_counts: BTreeMap<String, usize>,

    /// Counts per calendar date, timestamped records only.
    pub daily_counts: BTreeMap<NaiveDate, usize>,

    /// Counts per hour of day (0-23), timestamped records only.
    pub hourly_counts: BTreeMap<u32, usize>,

    /// Most frequent individual IP tokens, highest count first; ties keep
    /// first-seen order.
    pub top_ips: Vec<(String, usize)>,

    /// Per-(date, hour, topic) counts, sorted by date, hour, then topic.
    pub topic_activity: Vec<TopicActivity>,
}

/// One cell of the topic-by-time activity matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicActivity {
    pub date: NaiveDate,
    pub hour: u32,
    pub topic: Topic,
    pub count: usize,
}

/// Aggregate with the default top-IP count.
pub fn aggregate<'a, I>(records: I) -> Stats
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    aggregate_with(records, DEFAULT_TOP_IP_COUNT)
}

/// Aggregate, reporting at most `top_ip_count` addresses in `top_ips`.
pub fn aggregate_with<'a, I>(records: I, top_ip_count: usize) -> Stats
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut stats = Stats::default();
    let mut activity: BTreeMap<(NaiveDate, u32, Topic), usize> = BTreeMap::new();
    let mut ips: Vec<&str> = Vec::new();

    for record in records {
        stats.total_records += 1;
        *stats.topic_counts.entry(record.topic).or_insert(0) += 1;
        *stats.severity_counts.entry(record.severity).or_insert(0) += 1;

        if let Some(ref iface) = record.interface {
            *stats.interface_counts.entry(iface.clone()).or_insert(0) += 1;
        }

        if let Some(ts) = record.timestamp {
            let (date, hour) = (ts.date(), ts.hour());
            stats.timestamped_records += 1;
            *stats.daily_counts.entry(date).or_insert(0) += 1;
            *stats.hourly_counts.entry(hour).or_insert(0) += 1;
            *activity.entry((date, hour, record.topic)).or_insert(0) += 1;
        }

        ips.extend(record.ip_addresses.iter().map(String::as_str));
    }

    stats.top_ips = most_common(ips, top_ip_count);
    stats.topic_activity = activity
        .into_iter()
        .map(|((date, hour, topic), count)| TopicActivity {
            date,
            hour,
            topic,
            count,
        })
        .collect();

    tracing::debug!(
        records = stats.total_records,
        timestamped = stats.timestamped_records,
        distinct_ips = stats.top_ips.len(),
        "Statistics aggregated"
    );

    stats
}

/// Frequency ranking with stable tie-breaking.
///
/// Items are tallied in first-seen order, then stably sorted by descending
/// count, so items with equal counts keep the order in which they first
/// appeared. Returns at most `limit` `(item, count)` pairs.
pub fn most_common<'a, I>(items: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut tally: Vec<(&'a str, usize)> = Vec::new();

    for item in items {
        match slots.get(item) {
            Some(&slot) => tally[slot].1 += 1,
            None => {
                slots.insert(item, tally.len());
                tally.push((item, 1));
            }
        }
    }

    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
        .into_iter()
        .take(limit)
        .map(|(item, count)| (item.to_string(), count))
        .collect()
}
