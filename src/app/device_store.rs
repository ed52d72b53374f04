// RouterLens - app/device_store.rs
//
// Device profile interchange: save and load a DeviceProfile as a JSON
// document so hand-entered details (name, location, serial) survive
// between runs and can be shared.
//
// - Saved atomically (write temp, rename final) so a crash mid-save never
//   corrupts the previous good document.
// - Missing keys load as empty strings; a partially filled document is valid.
// - Unlike a best-effort cache, load failures are returned to the caller,
//   which decides whether to fall back to an inferred profile.

use crate::core::model::DeviceProfile;
use crate::util::constants::DEVICE_FILE_NAME;
use crate::util::error::DeviceFileError;
use std::path::{Path, PathBuf};

/// Resolve the default device profile path from the platform data directory.
pub fn device_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DEVICE_FILE_NAME)
}

/// Save `profile` to `path` atomically (write temp, rename).
///
/// Creates all parent directories as needed.
pub fn save_profile(profile: &DeviceProfile, path: &Path) -> Result<(), DeviceFileError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DeviceFileError::Io {
            path: parent.to_path_buf(),
            operation: "create directory for",
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(profile).map_err(|e| DeviceFileError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json.as_bytes()).map_err(|e| DeviceFileError::Io {
        path: tmp.clone(),
        operation: "write",
        source: e,
    })?;

    std::fs::rename(&tmp, path).map_err(|e| {
        // Secondary cleanup failure is irrelevant next to the rename error.
        let _ = std::fs::remove_file(&tmp);
        DeviceFileError::Io {
            path: path.to_path_buf(),
            operation: "finalise",
            source: e,
        }
    })?;

    tracing::info!(path = %path.display(), "Device profile saved");
    Ok(())
}

/// Load a device profile document from `path`.
pub fn load_profile(path: &Path) -> Result<DeviceProfile, DeviceFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| DeviceFileError::Io {
        path: path.to_path_buf(),
        operation: "read",
        source: e,
    })?;

    let profile: DeviceProfile =
        serde_json::from_str(&content).map_err(|e| DeviceFileError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    tracing::info!(
        path = %path.display(),
        model = %profile.model,
        "Device profile loaded"
    );
    Ok(profile)
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_profile() -> DeviceProfile {
        DeviceProfile {
            name: "core-1".to_string(),
            ip_address: "10.10.0.1".to_string(),
            model: "ccr2004-16g-2s+".to_string(),
            serial_number: "HE40812ABC".to_string(),
            firmware_version: "7.14.2".to_string(),
            location: "Rack 3".to_string(),
            description: "Edge aggregation".to_string(),
            architecture: "arm64".to_string(),
            cpu: "AL32400".to_string(),
            memory: "4096 MiB".to_string(),
            last_update: "2024-01-05T10:15:30.000000".to_string(),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("device.json");
        let original = sample_profile();

        save_profile(&original, &path).expect("save should succeed");
        let loaded = load_profile(&path).expect("load should succeed after save");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("device.json");
        save_profile(&sample_profile(), &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_document_uses_snake_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("device.json");
        save_profile(&sample_profile(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"firmware_version\""));
        assert!(text.contains("\"serial_number\""));
        assert!(text.contains("\"last_update\""));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_profile(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DeviceFileError::Io { operation: "read", .. }));
    }

    #[test]
    fn test_load_malformed_json_is_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("device.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = load_profile(&path).unwrap_err();
        assert!(matches!(err, DeviceFileError::Json { .. }));
    }

    #[test]
    fn test_partial_document_defaults_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("device.json");
        std::fs::write(&path, br#"{"name": "branch-gw", "location": "Depot"}"#).unwrap();

        let loaded = load_profile(&path).unwrap();
        assert_eq!(loaded.name, "branch-gw");
        assert_eq!(loaded.location, "Depot");
        assert!(loaded.model.is_empty());
        assert!(loaded.last_update.is_empty());
    }

    #[test]
    fn test_leftover_temp_file_does_not_block_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("device.json");
        save_profile(&sample_profile(), &path).unwrap();

        std::fs::write(path.with_extension("json.tmp"), b"garbage").unwrap();

        let mut updated = sample_profile();
        updated.location = "Rack 4".to_string();
        save_profile(&updated, &path).unwrap();

        assert_eq!(load_profile(&path).unwrap().location, "Rack 4");
    }

    #[test]
    fn test_device_path_joins_file_name() {
        let path = device_path(Path::new("/data/routerlens"));
        assert_eq!(path, Path::new("/data/routerlens").join(DEVICE_FILE_NAME));
    }
}
