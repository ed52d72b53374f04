// RouterLens - app/report.rs
//
// Plain-text analysis report for terminal output.
//
// Groups are printed in a fixed order. Empty groups print "(none)" so the
// layout is stable for an empty or fully filtered table.

use crate::core::model::{DeviceClassification, DeviceProfile};
use crate::core::stats::Stats;
use std::fmt::Write;

/// Rows shown per count table before truncation.
const MAX_TABLE_ROWS: usize = 24;

/// Render the report. `corpus_size` is the unfiltered record count.
pub fn render_report(
    corpus_size: usize,
    stats: &Stats,
    profile: &DeviceProfile,
    classification: &DeviceClassification,
) -> String {
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "== Records ==");
    let _ = writeln!(out, "  total:        {corpus_size}");
    let _ = writeln!(out, "  matched:      {}", stats.total_records);
    let _ = writeln!(out, "  timestamped:  {}", stats.timestamped_records);

    section(
        &mut out,
        "Topics",
        stats.topic_counts.iter().map(|(k, v)| (k.label().to_string(), *v)),
    );
    section(
        &mut out,
        "Severities",
        stats.severity_counts.iter().map(|(k, v)| (k.label().to_string(), *v)),
    );
    section(
        &mut out,
        "Interfaces",
        stats.interface_counts.iter().map(|(k, v)| (k.clone(), *v)),
    );
    section(
        &mut out,
        "Daily",
        stats.daily_counts.iter().map(|(k, v)| (k.to_string(), *v)),
    );
    section(
        &mut out,
        "Hourly",
        stats.hourly_counts.iter().map(|(k, v)| (format!("{k:02}:00"), *v)),
    );
    section(&mut out, "Top IPs", stats.top_ips.iter().cloned());

    let _ = writeln!(out, "\n== Device ==");
    let fields = [
        ("name", &profile.name),
        ("ip_address", &profile.ip_address),
        ("model", &profile.model),
        ("serial_number", &profile.serial_number),
        ("firmware_version", &profile.firmware_version),
        ("location", &profile.location),
        ("description", &profile.description),
        ("architecture", &profile.architecture),
        ("cpu", &profile.cpu),
        ("memory", &profile.memory),
        ("last_update", &profile.last_update),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            let _ = writeln!(out, "  {label:<18}{value}");
        }
    }

    let _ = writeln!(out, "\n== Classification ==");
    let _ = writeln!(out, "  type:         {}", classification.device_type);
    let _ = writeln!(out, "  role:         {}", classification.role);
    if classification.capabilities.is_empty() {
        let _ = writeln!(out, "  capabilities: (none)");
    } else {
        let _ = writeln!(
            out,
            "  capabilities: {}",
            classification.capabilities.join(", ")
        );
    }

    out
}

fn section<I>(out: &mut String, title: &str, rows: I)
where
    I: IntoIterator<Item = (String, usize)>,
{
    let _ = writeln!(out, "\n== {title} ==");
    let mut shown = 0;
    let mut hidden = 0;
    for (key, count) in rows {
        if shown < MAX_TABLE_ROWS {
            let _ = writeln!(out, "  {key:<24}{count:>8}");
            shown += 1;
        } else {
            hidden += 1;
        }
    }
    if shown == 0 {
        let _ = writeln!(out, "  (none)");
    } else if hidden > 0 {
        let _ = writeln!(out, "  ... {hidden} more");
    }
}
