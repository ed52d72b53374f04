// RouterLens - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "RouterLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "RouterLens";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Parsing
// =============================================================================

/// chrono format of the RouterOS log timestamp (`jan/05/2024 10:15:30`).
pub const LOG_TIMESTAMP_FORMAT: &str = "%b/%d/%Y %H:%M:%S";

/// Separator used when a record's address lists are rendered as one string.
pub const ADDRESS_LIST_SEPARATOR: &str = ", ";

/// Sentinel filter value meaning "do not filter on this field".
pub const FILTER_ALL: &str = "All";

/// Formats accepted for user-supplied time bounds, tried in order.
pub const TIME_BOUND_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%b/%d/%Y %H:%M:%S",
];

// =============================================================================
// Device inference
// =============================================================================

/// Factory-default gateway addresses that say nothing about which device
/// produced the log. Excluded from device IP inference.
pub const COMMON_PRIVATE_DEFAULTS: &[&str] = &["192.168.1.1", "10.0.0.1", "172.16.0.1"];

// =============================================================================
// Statistics
// =============================================================================

/// Default number of addresses reported in `top_ips`.
pub const DEFAULT_TOP_IP_COUNT: usize = 10;

/// Minimum user-configurable top-IP count.
pub const MIN_TOP_IP_COUNT: usize = 1;

/// Maximum user-configurable top-IP count.
pub const MAX_TOP_IP_COUNT: usize = 100;

// =============================================================================
// Inventory
// =============================================================================

/// Default request timeout for the inventory collaborator (seconds).
pub const DEFAULT_INVENTORY_TIMEOUT_SECS: u64 = 5;

/// Minimum user-configurable inventory timeout (seconds).
pub const MIN_INVENTORY_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable inventory timeout (seconds).
pub const MAX_INVENTORY_TIMEOUT_SECS: u64 = 60;

/// Device type string sent to the inventory when creating a new device.
pub const INVENTORY_DEVICE_TYPE: &str = "routeros";

/// Status string sent to the inventory when creating a new device.
pub const INVENTORY_DEFAULT_STATUS: &str = "online";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
/// Prevents accidental exposure of sensitive data in long lines.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Export
// =============================================================================

/// Column header of the record sheet, in output order.
pub const EXPORT_COLUMNS: [&str; 9] = [
    "log_id",
    "timestamp",
    "topic",
    "message",
    "ip_addresses",
    "mac_addresses",
    "interface",
    "severity",
    "raw_log",
];

/// Timestamp rendering used in exports and reports.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Device profile file name (stored in the platform data directory).
pub const DEVICE_FILE_NAME: &str = "device.json";
