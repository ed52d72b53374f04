// RouterLens - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation across module boundaries.
//
// The parsing and aggregation path is total over arbitrary input and has
// no error type of its own; everything here belongs to I/O, configuration,
// or user-supplied query input.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all RouterLens operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum RouterLensError {
    /// Filter criteria could not be built.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// Device profile file could not be read or written.
    DeviceFile(DeviceFileError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for RouterLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::DeviceFile(e) => write!(f, "Device profile error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for RouterLensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::DeviceFile(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to building filter criteria from user input.
#[derive(Debug)]
pub enum FilterError {
    /// A time bound did not match any accepted format.
    InvalidTimeBound { value: String },

    /// A topic name is not one of the known topics.
    UnknownTopic { value: String },

    /// A severity name is not one of the known severities.
    UnknownSeverity { value: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeBound { value } => write!(
                f,
                "Invalid time bound '{value}'. Expected e.g. '2024-01-05 10:15:30' \
                 or 'jan/05/2024 10:15:30'"
            ),
            Self::UnknownTopic { value } => write!(
                f,
                "Unknown topic '{value}'. Expected Firewall, DHCP, Wireless, System, \
                 Authentication, Other or All"
            ),
            Self::UnknownSeverity { value } => write!(
                f,
                "Unknown severity '{value}'. Expected error, warning, notice, info or All"
            ),
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for RouterLensError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for RouterLensError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Device profile file errors
// ---------------------------------------------------------------------------

/// Errors related to loading and saving the device profile document.
#[derive(Debug)]
pub enum DeviceFileError {
    /// I/O error reading or writing the profile file.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },

    /// The document is not valid profile JSON.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for DeviceFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "Cannot {operation} device profile '{}': {source}",
                path.display()
            ),
            Self::Json { path, source } => write!(
                f,
                "Device profile '{}' is malformed: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for DeviceFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<DeviceFileError> for RouterLensError {
    fn from(e: DeviceFileError) -> Self {
        Self::DeviceFile(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for RouterLensError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for RouterLens results.
pub type Result<T> = std::result::Result<T, RouterLensError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_device_file_error_preserves_source_chain() {
        let inner = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: RouterLensError = DeviceFileError::Io {
            path: PathBuf::from("device.json"),
            operation: "read",
            source: inner,
        }
        .into();

        let msg = err.to_string();
        assert!(msg.contains("device.json"), "got: {msg}");
        let source = err.source().expect("top-level error should expose its cause");
        assert!(source.source().is_some(), "io::Error should remain in the chain");
    }

    #[test]
    fn test_config_range_error_message_names_field() {
        let err = ConfigError::ValueOutOfRange {
            field: "[analysis] top_ip_count".to_string(),
            value: "0".to_string(),
            expected: "1-100".to_string(),
        };
        assert!(err.to_string().contains("top_ip_count"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_config_error_converts_into_top_level() {
        let err: RouterLensError = ConfigError::Io {
            path: PathBuf::from("custom.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        }
        .into();

        assert!(matches!(err, RouterLensError::Config(_)));
        assert!(err.to_string().contains("custom.toml"), "got: {err}");
        assert!(err.source().is_some());
    }
}
