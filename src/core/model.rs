// RouterLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::ADDRESS_LIST_SEPARATOR;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Log Record (output of the line parser)
// =============================================================================

/// A single parsed router log line.
///
/// Records are produced once per non-blank input line and never mutated
/// afterwards; filtering and aggregation work on shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// 0-based position among the non-blank lines of the source text.
    pub id: u64,

    /// Parsed `MMM/DD/YYYY HH:MM:SS` timestamp. `None` if the line had no
    /// such text or it failed strict parsing.
    pub timestamp: Option<NaiveDateTime>,

    /// Coarse category chosen by first-match priority.
    pub topic: Topic,

    /// Keyword-derived urgency tier.
    pub severity: Severity,

    /// Text after the first `:` (trimmed), or the whole line if it has none.
    pub message: String,

    /// IPv4 literals in order of appearance, duplicates retained.
    pub ip_addresses: Vec<String>,

    /// Colon-separated MAC addresses in order of appearance.
    pub mac_addresses: Vec<String>,

    /// Token captured from the first `interface=<token>` fragment.
    pub interface: Option<String>,

    /// The original trimmed line.
    pub raw_log: String,
}

impl LogRecord {
    /// IP addresses rendered as one delimited string (the exported form).
    pub fn ip_list(&self) -> String {
        self.ip_addresses.join(ADDRESS_LIST_SEPARATOR)
    }

    /// MAC addresses rendered as one delimited string (the exported form).
    pub fn mac_list(&self) -> String {
        self.mac_addresses.join(ADDRESS_LIST_SEPARATOR)
    }
}

// =============================================================================
// Topic
// =============================================================================

/// Log category, declared in classification priority order.
///
/// `Other` is the fallback when no topic marker matches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Topic {
    Firewall,
    #[serde(rename = "DHCP")]
    Dhcp,
    Wireless,
    System,
    Authentication,
    #[default]
    Other,
}

impl Topic {
    /// Returns all variants in priority order.
    pub fn all() -> &'static [Topic] {
        &[
            Topic::Firewall,
            Topic::Dhcp,
            Topic::Wireless,
            Topic::System,
            Topic::Authentication,
            Topic::Other,
        ]
    }

    /// Human-readable label, also the exported value.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Firewall => "Firewall",
            Topic::Dhcp => "DHCP",
            Topic::Wireless => "Wireless",
            Topic::System => "System",
            Topic::Authentication => "Authentication",
            Topic::Other => "Other",
        }
    }

    /// Look a topic up by label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Topic> {
        Topic::all()
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Severity tiers, ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Notice,
    #[default]
    Info,
}

impl Severity {
    /// Returns all variants in display order (most severe first).
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Error,
            Severity::Warning,
            Severity::Notice,
            Severity::Info,
        ]
    }

    /// Lower-case label, also the exported value.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
        }
    }

    /// Look a severity up by label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Severity> {
        Severity::all()
            .iter()
            .copied()
            .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Device Profile
// =============================================================================

/// Identity record of the device that produced the log.
///
/// Either inferred from the corpus, loaded from a profile document, or
/// both merged. All fields are free text; `last_update` is an ISO-8601
/// local timestamp refreshed whenever the profile is resolved or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub name: String,
    pub ip_address: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
    pub location: String,
    pub description: String,
    pub architecture: String,
    pub cpu: String,
    pub memory: String,
    pub last_update: String,
}

impl DeviceProfile {
    /// Stamp `last_update` with the current local time.
    pub fn touch(&mut self) {
        self.last_update = chrono::Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
    }

    /// Fill every empty field of `self` with the matching non-empty field
    /// of `other`. Fields already set in `self` are never overwritten.
    ///
    /// `last_update` is not merged; callers stamp it with [`touch`](Self::touch).
    pub fn merge_missing(&mut self, other: &DeviceProfile) {
        let pairs: [(&mut String, &String); 10] = [
            (&mut self.name, &other.name),
            (&mut self.ip_address, &other.ip_address),
            (&mut self.model, &other.model),
            (&mut self.serial_number, &other.serial_number),
            (&mut self.firmware_version, &other.firmware_version),
            (&mut self.location, &other.location),
            (&mut self.description, &other.description),
            (&mut self.architecture, &other.architecture),
            (&mut self.cpu, &other.cpu),
            (&mut self.memory, &other.memory),
        ];
        for (mine, theirs) in pairs {
            if mine.is_empty() && !theirs.is_empty() {
                mine.clone_from(theirs);
            }
        }
    }
}

// =============================================================================
// Device Classification
// =============================================================================

/// Product family inferred from the model string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum DeviceType {
    #[serde(rename = "Cloud Core Router")]
    CloudCoreRouter,
    #[serde(rename = "Cloud Router Switch")]
    CloudRouterSwitch,
    #[serde(rename = "High Performance Router")]
    HighPerformanceRouter,
    #[serde(rename = "Home Access Point")]
    HomeAccessPoint,
    #[serde(rename = "Wireless Access Point")]
    WirelessAccessPoint,
    #[serde(rename = "Small Office Router")]
    SmallOfficeRouter,
    #[default]
    Unknown,
}

impl DeviceType {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::CloudCoreRouter => "Cloud Core Router",
            DeviceType::CloudRouterSwitch => "Cloud Router Switch",
            DeviceType::HighPerformanceRouter => "High Performance Router",
            DeviceType::HomeAccessPoint => "Home Access Point",
            DeviceType::WirelessAccessPoint => "Wireless Access Point",
            DeviceType::SmallOfficeRouter => "Small Office Router",
            DeviceType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Network role implied by the product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum DeviceRole {
    #[serde(rename = "Core Router")]
    CoreRouter,
    #[serde(rename = "Distribution Switch")]
    DistributionSwitch,
    #[serde(rename = "Edge Router")]
    EdgeRouter,
    #[serde(rename = "Access Point")]
    AccessPoint,
    #[default]
    Unknown,
}

impl DeviceRole {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceRole::CoreRouter => "Core Router",
            DeviceRole::DistributionSwitch => "Distribution Switch",
            DeviceRole::EdgeRouter => "Edge Router",
            DeviceRole::AccessPoint => "Access Point",
            DeviceRole::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived description of a device profile. Never persisted.
///
/// `capabilities` is an annotated list: rules may add the same tag twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceClassification {
    pub device_type: DeviceType,
    pub role: DeviceRole,
    pub capabilities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_labels_round_trip() {
        for topic in Topic::all() {
            assert_eq!(Topic::from_label(topic.label()), Some(*topic));
        }
        assert_eq!(Topic::from_label("dhcp"), Some(Topic::Dhcp));
        assert_eq!(Topic::from_label("All"), None);
    }

    #[test]
    fn test_severity_default_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
        assert_eq!(Severity::from_label("WARNING"), Some(Severity::Warning));
    }

    #[test]
    fn test_topic_serialises_with_label() {
        let json = serde_json::to_string(&Topic::Dhcp).unwrap();
        assert_eq!(json, "\"DHCP\"");
        let json = serde_json::to_string(&Severity::Notice).unwrap();
        assert_eq!(json, "\"notice\"");
    }

    #[test]
    fn test_address_lists_render_delimited() {
        let record = LogRecord {
            id: 0,
            timestamp: None,
            topic: Topic::Other,
            severity: Severity::Info,
            message: String::new(),
            ip_addresses: vec!["10.1.1.1".to_string(), "10.1.1.2".to_string()],
            mac_addresses: Vec::new(),
            interface: None,
            raw_log: String::new(),
        };
        assert_eq!(record.ip_list(), "10.1.1.1, 10.1.1.2");
        assert_eq!(record.mac_list(), "");
    }

    #[test]
    fn test_merge_missing_only_fills_gaps() {
        let mut loaded = DeviceProfile {
            name: "edge-01".to_string(),
            model: "RB4011".to_string(),
            ..Default::default()
        };
        let inferred = DeviceProfile {
            model: "rb951".to_string(),
            ip_address: "203.0.113.7".to_string(),
            firmware_version: "7.1".to_string(),
            ..Default::default()
        };
        loaded.merge_missing(&inferred);

        assert_eq!(loaded.name, "edge-01");
        assert_eq!(loaded.model, "RB4011", "existing values must win");
        assert_eq!(loaded.ip_address, "203.0.113.7");
        assert_eq!(loaded.firmware_version, "7.1");
        assert!(loaded.location.is_empty());
    }

    #[test]
    fn test_touch_sets_iso_timestamp() {
        let mut profile = DeviceProfile::default();
        profile.touch();
        assert!(
            chrono::NaiveDateTime::parse_from_str(&profile.last_update, "%Y-%m-%dT%H:%M:%S%.f")
                .is_ok(),
            "got: {}",
            profile.last_update
        );
    }
}
