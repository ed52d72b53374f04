// RouterLens - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for RouterLens data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/routerlens/ or %APPDATA%\RouterLens\config\)
    pub config_dir: PathBuf,

    /// Data directory for the saved device profile.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[inventory]` section.
    pub inventory: InventorySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Number of addresses reported in the top-IP ranking.
    pub top_ip_count: Option<usize>,
    /// Addresses excluded from device IP inference in addition to the
    /// built-in factory defaults.
    pub extra_ip_denylist: Option<Vec<String>>,
}

/// `[inventory]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InventorySection {
    /// Inventory API base URL.
    pub endpoint: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    // -- Analysis --
    /// Number of addresses reported in `top_ips`.
    pub top_ip_count: usize,
    /// Extra addresses excluded from device IP inference.
    pub extra_ip_denylist: Vec<String>,

    // -- Inventory --
    /// Inventory API base URL, without trailing slash.
    pub inventory_endpoint: Option<String>,
    /// Inventory request timeout in seconds.
    pub inventory_timeout_secs: u64,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            top_ip_count: constants::DEFAULT_TOP_IP_COUNT,
            extra_ip_denylist: Vec::new(),
            inventory_endpoint: None,
            inventory_timeout_secs: constants::DEFAULT_INVENTORY_TIMEOUT_SECS,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning;
/// the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let raw = match read_raw_config(config_path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    validate(raw)
}

/// Load and validate a config file the user named explicitly.
///
/// Unlike [`load_config`], a missing, unreadable or unparseable file is an
/// error. Out-of-range values still only produce warnings.
pub fn load_explicit_config(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw = read_raw_config(config_path)?;
    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    Ok(validate(raw))
}

fn read_raw_config(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    let mut out_of_range = |field: &str, value: String, expected: String| {
        warnings.push(format!(
            "{}. Using default.",
            ConfigError::ValueOutOfRange {
                field: field.to_string(),
                value,
                expected,
            }
        ));
    };

    // -- Analysis: top_ip_count --
    if let Some(count) = raw.analysis.top_ip_count {
        if (constants::MIN_TOP_IP_COUNT..=constants::MAX_TOP_IP_COUNT).contains(&count) {
            config.top_ip_count = count;
        } else {
            out_of_range(
                "[analysis] top_ip_count",
                count.to_string(),
                format!("{}-{}", constants::MIN_TOP_IP_COUNT, constants::MAX_TOP_IP_COUNT),
            );
        }
    }

    // -- Analysis: extra_ip_denylist --
    if let Some(list) = raw.analysis.extra_ip_denylist {
        config.extra_ip_denylist = list
            .into_iter()
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .collect();
    }

    // -- Inventory: timeout_secs --
    if let Some(secs) = raw.inventory.timeout_secs {
        if (constants::MIN_INVENTORY_TIMEOUT_SECS..=constants::MAX_INVENTORY_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.inventory_timeout_secs = secs;
        } else {
            out_of_range(
                "[inventory] timeout_secs",
                secs.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_INVENTORY_TIMEOUT_SECS,
                    constants::MAX_INVENTORY_TIMEOUT_SECS
                ),
            );
        }
    }

    // -- Inventory: endpoint --
    if let Some(endpoint) = raw.inventory.endpoint {
        let endpoint = endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            // Explicitly unset.
        } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            config.inventory_endpoint = Some(endpoint.to_string());
        } else {
            out_of_range(
                "[inventory] endpoint",
                endpoint.to_string(),
                "an http:// or https:// URL".to_string(),
            );
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(PathBuf::from(file));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}
