// RouterLens - app/inventory.rs
//
// Mapping between DeviceProfile and the external device-inventory schema.
//
// The inventory service speaks camelCase JSON with a few renamed fields
// (routerOsVersion, memorySize, lastUpdated). This module owns the
// translation and the lookup URL shapes; transport is left to the caller.

use crate::core::export::write_json;
use crate::core::model::DeviceProfile;
use crate::platform::config::AppConfig;
use crate::util::constants::{INVENTORY_DEFAULT_STATUS, INVENTORY_DEVICE_TYPE};
use crate::util::error::ExportError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Inventory connection settings derived from `[inventory]` in config.toml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Base URL without trailing slash. `None` = inventory integration off.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl InventoryConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            endpoint: config.inventory_endpoint.clone(),
            timeout_secs: config.inventory_timeout_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.as_deref().is_some_and(|e| !e.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A device as the inventory service represents it.
///
/// Unknown keys in responses (ids, credentials) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryDevice {
    pub name: String,
    /// Omitted from update payloads; the address identifies the record.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip_address: String,
    pub model: String,
    pub serial_number: String,
    pub router_os_version: String,
    pub location: String,
    pub description: String,
    pub architecture: String,
    pub cpu: String,
    pub memory_size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Only sent when creating a device.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Only sent when creating a device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl InventoryDevice {
    /// Build a creation payload: every profile field plus the fixed
    /// device type and initial status.
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        let mut payload = Self::update_from_profile(profile);
        payload.ip_address = profile.ip_address.clone();
        payload.device_type = Some(INVENTORY_DEVICE_TYPE.to_string());
        payload.status = Some(INVENTORY_DEFAULT_STATUS.to_string());
        payload
    }

    /// Build an update payload for an existing inventory record. The
    /// address, type and status are left out.
    pub fn update_from_profile(profile: &DeviceProfile) -> Self {
        Self {
            name: profile.name.clone(),
            ip_address: String::new(),
            model: profile.model.clone(),
            serial_number: profile.serial_number.clone(),
            router_os_version: profile.firmware_version.clone(),
            location: profile.location.clone(),
            description: profile.description.clone(),
            architecture: profile.architecture.clone(),
            cpu: profile.cpu.clone(),
            memory_size: profile.memory.clone(),
            last_updated: None,
            device_type: None,
            status: None,
        }
    }

    /// Convert an inventory response into a profile. A record without
    /// `lastUpdated` is stamped with the current time.
    pub fn into_profile(self) -> DeviceProfile {
        let mut profile = DeviceProfile {
            name: self.name,
            ip_address: self.ip_address,
            model: self.model,
            serial_number: self.serial_number,
            firmware_version: self.router_os_version,
            location: self.location,
            description: self.description,
            architecture: self.architecture,
            cpu: self.cpu,
            memory: self.memory_size,
            last_update: String::new(),
        };
        match self.last_updated {
            Some(ts) if !ts.is_empty() => profile.last_update = ts,
            _ => profile.touch(),
        }
        profile
    }
}

/// How to look a device up in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceLookup<'a> {
    Id(&'a str),
    Ip(&'a str),
}

/// Build the lookup URL, or `None` when no endpoint is configured.
pub fn device_lookup_url(config: &InventoryConfig, lookup: DeviceLookup<'_>) -> Option<String> {
    let endpoint = config.endpoint.as_deref().filter(|e| !e.is_empty())?;
    let endpoint = endpoint.trim_end_matches('/');
    let url = match lookup {
        DeviceLookup::Id(id) => format!("{endpoint}/devices/{id}"),
        DeviceLookup::Ip(ip) => format!("{endpoint}/devices?ip={ip}"),
    };
    tracing::debug!(url = %url, "Inventory lookup URL built");
    Some(url)
}

/// URL that accepts creation payloads, or `None` when unconfigured.
pub fn devices_collection_url(config: &InventoryConfig) -> Option<String> {
    let endpoint = config.endpoint.as_deref().filter(|e| !e.is_empty())?;
    Some(format!("{}/devices", endpoint.trim_end_matches('/')))
}

/// Where a sync of one device would go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTargets {
    /// Existence check by address.
    pub lookup_url: String,
    /// Creation endpoint used when the lookup finds nothing.
    pub collection_url: String,
    pub timeout: Duration,
}

/// Resolve the sync targets for `profile`, or `None` when the inventory
/// is not configured.
pub fn sync_targets(config: &InventoryConfig, profile: &DeviceProfile) -> Option<SyncTargets> {
    if !config.is_configured() {
        return None;
    }
    Some(SyncTargets {
        lookup_url: device_lookup_url(config, DeviceLookup::Ip(&profile.ip_address))?,
        collection_url: devices_collection_url(config)?,
        timeout: config.timeout(),
    })
}

/// Write the creation payload for `profile` as pretty JSON.
pub fn write_creation_payload<W: Write>(
    profile: &DeviceProfile,
    writer: W,
    path: &Path,
) -> Result<(), ExportError> {
    write_json(&InventoryDevice::from_profile(profile), writer, path)?;
    tracing::info!(path = %path.display(), "Inventory payload written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> InventoryConfig {
        InventoryConfig {
            endpoint: Some("https://inv.example.net/api".to_string()),
            timeout_secs: 5,
        }
    }

    fn profile() -> DeviceProfile {
        DeviceProfile {
            name: "core-1".to_string(),
            ip_address: "10.10.0.1".to_string(),
            model: "ccr1036".to_string(),
            firmware_version: "7.14".to_string(),
            memory: "4096".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_urls() {
        let config = configured();
        assert_eq!(
            device_lookup_url(&config, DeviceLookup::Id("42")).as_deref(),
            Some("https://inv.example.net/api/devices/42")
        );
        assert_eq!(
            device_lookup_url(&config, DeviceLookup::Ip("10.10.0.1")).as_deref(),
            Some("https://inv.example.net/api/devices?ip=10.10.0.1")
        );
        assert_eq!(
            devices_collection_url(&config).as_deref(),
            Some("https://inv.example.net/api/devices")
        );
    }

    #[test]
    fn test_unconfigured_yields_no_url() {
        let config = InventoryConfig {
            endpoint: None,
            timeout_secs: 5,
        };
        assert!(!config.is_configured());
        assert!(device_lookup_url(&config, DeviceLookup::Id("1")).is_none());
        assert!(devices_collection_url(&config).is_none());
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig {
            inventory_endpoint: Some("http://localhost:8080".to_string()),
            inventory_timeout_secs: 9,
            ..Default::default()
        };
        let config = InventoryConfig::from_app_config(&app);
        assert!(config.is_configured());
        assert_eq!(config.timeout(), Duration::from_secs(9));
    }

    #[test]
    fn test_creation_payload_shape() {
        let payload = InventoryDevice::from_profile(&profile());
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["ipAddress"], "10.10.0.1");
        assert_eq!(json["routerOsVersion"], "7.14");
        assert_eq!(json["memorySize"], "4096");
        assert_eq!(json["type"], "routeros");
        assert_eq!(json["status"], "online");
        assert!(json.get("firmware_version").is_none());
        assert!(json.get("lastUpdated").is_none());
    }

    #[test]
    fn test_update_payload_omits_identity_fields() {
        let payload = InventoryDevice::update_from_profile(&profile());
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("ipAddress").is_none());
        assert!(json.get("type").is_none());
        assert!(json.get("status").is_none());
        assert_eq!(json["model"], "ccr1036");
    }

    #[test]
    fn test_response_into_profile() {
        let body = r#"{
            "id": 7,
            "name": "edge",
            "ipAddress": "192.0.2.1",
            "routerOsVersion": "6.49",
            "memorySize": "256",
            "lastUpdated": "2024-02-01T08:00:00",
            "username": "admin"
        }"#;
        let device: InventoryDevice = serde_json::from_str(body).unwrap();
        let profile = device.into_profile();

        assert_eq!(profile.name, "edge");
        assert_eq!(profile.ip_address, "192.0.2.1");
        assert_eq!(profile.firmware_version, "6.49");
        assert_eq!(profile.memory, "256");
        assert_eq!(profile.last_update, "2024-02-01T08:00:00");
        assert!(profile.model.is_empty());
    }

    #[test]
    fn test_sync_targets() {
        let targets = sync_targets(&configured(), &profile()).unwrap();
        assert_eq!(
            targets.lookup_url,
            "https://inv.example.net/api/devices?ip=10.10.0.1"
        );
        assert_eq!(targets.collection_url, "https://inv.example.net/api/devices");
        assert_eq!(targets.timeout, Duration::from_secs(5));

        let off = InventoryConfig {
            endpoint: Some(String::new()),
            timeout_secs: 5,
        };
        assert!(sync_targets(&off, &profile()).is_none());
    }

    #[test]
    fn test_creation_payload_written_and_flushed() {
        let mut buf = Vec::new();
        write_creation_payload(&profile(), &mut buf, Path::new("payload.json")).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["ipAddress"], "10.10.0.1");
        assert_eq!(json["status"], "online");
    }

    struct FailingFlush;

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("no space left"))
        }
    }

    #[test]
    fn test_creation_payload_reports_flush_failure() {
        let err = write_creation_payload(&profile(), FailingFlush, Path::new("payload.json"))
            .unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_response_without_timestamp_is_stamped() {
        let device: InventoryDevice = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(!device.into_profile().last_update.is_empty());
    }
}
