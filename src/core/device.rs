// RouterLens - core/device.rs
//
// Device identity inference and classification.
//
// Inference is an evidence scan over the parsed corpus: every qualifying
// record overwrites the previous extraction, so the LAST qualifying record
// wins for firmware and model. The device address is the most frequent IP
// in the whole corpus after dropping factory-default gateways.
// Absence of evidence leaves a field empty; nothing here fails.

use crate::core::model::{
    DeviceClassification, DeviceProfile, DeviceRole, DeviceType, LogRecord, Topic,
};
use crate::core::stats::most_common;
use crate::util::constants::COMMON_PRIVATE_DEFAULTS;
use regex::Regex;
use std::sync::OnceLock;

struct EvidencePatterns {
    firmware: Regex,
    /// Model code introduced by the word "model" (`model: RB4011iGS+`).
    labelled_model: Regex,
    /// Free-standing model code (`board name CCR1036-8G`, `board: hapac lite`).
    bare_model: Regex,
}

fn evidence_patterns() -> &'static EvidencePatterns {
    static PATTERNS: OnceLock<EvidencePatterns> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("device: invalid built-in regex")
        }

        EvidencePatterns {
            firmware: re(r"routeros[^0-9]*([0-9]+\.[0-9]+(?:\.[0-9]+)?)"),
            labelled_model: re(r"(?i)model\W*((?:rb|ccr|crs|hap)\w+)"),
            bare_model: re(r"(?i)\b((?:rb|ccr|crs|hap)\w+)"),
        }
    })
}

/// Infer a device profile using the built-in address denylist.
pub fn resolve_device<'a, I>(records: I) -> DeviceProfile
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    resolve_device_with(records, &[])
}

/// Infer a device profile, additionally excluding `extra_denylist`
/// addresses from IP inference.
///
/// Firmware and model come from System records only; the IP address is
/// drawn from every record. `last_update` is stamped with the current time.
pub fn resolve_device_with<'a, I>(records: I, extra_denylist: &[String]) -> DeviceProfile
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let patterns = evidence_patterns();
    let mut profile = DeviceProfile::default();
    let mut candidate_ips: Vec<&str> = Vec::new();

    for record in records {
        candidate_ips.extend(
            record
                .ip_addresses
                .iter()
                .map(String::as_str)
                .filter(|ip| !is_denylisted(ip, extra_denylist)),
        );

        if record.topic != Topic::System {
            continue;
        }

        let message = record.message.to_lowercase();

        if message.contains("routeros") && message.contains("version") {
            if let Some(version) = first_capture(&patterns.firmware, &message) {
                profile.firmware_version = version;
            }
        }

        if message.contains("model") || message.contains("board") {
            let model = first_capture(&patterns.labelled_model, &message)
                .or_else(|| first_capture(&patterns.bare_model, &message));
            if let Some(model) = model {
                profile.model = model;
            }
        }
    }

    if let Some((ip, count)) = most_common(candidate_ips, 1).into_iter().next() {
        tracing::debug!(ip = %ip, occurrences = count, "Device address inferred");
        profile.ip_address = ip;
    }

    profile.touch();

    tracing::info!(
        model = %profile.model,
        firmware = %profile.firmware_version,
        ip = %profile.ip_address,
        "Device profile resolved"
    );

    profile
}

fn is_denylisted(ip: &str, extra: &[String]) -> bool {
    COMMON_PRIVATE_DEFAULTS.contains(&ip) || extra.iter().any(|e| e == ip)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// =============================================================================
// Classification
// =============================================================================

/// Classify a profile by its model, firmware, and architecture strings.
///
/// Model families are tested in a fixed order (CCR, CRS, RB/hAP, wAP, hEX)
/// and only the first matching family applies. Firmware and architecture
/// tags are appended on top of whatever the model produced.
pub fn classify(profile: &DeviceProfile) -> DeviceClassification {
    let model = profile.model.to_lowercase();
    let firmware = profile.firmware_version.to_lowercase();
    let architecture = profile.architecture.to_lowercase();

    let mut device_type = DeviceType::Unknown;
    let mut role = DeviceRole::Unknown;
    let mut caps: Vec<&str> = Vec::new();
    let any = |needles: &[&str]| needles.iter().any(|n| model.contains(n));

    if model.contains("ccr") {
        device_type = DeviceType::CloudCoreRouter;
        role = DeviceRole::CoreRouter;
        caps.push("High Performance Routing");
        if any(&["2004", "2116", "2216"]) {
            caps.push("10G+ Ports");
            caps.push("Advanced Routing");
        }
        if any(&["1009", "1016", "1036"]) {
            caps.push("Multi-core Processing");
        }
    } else if model.contains("crs") {
        device_type = DeviceType::CloudRouterSwitch;
        role = DeviceRole::DistributionSwitch;
        caps.push("Layer 3 Switching");
        if any(&["317", "326", "328"]) {
            caps.push("PoE Support");
        }
        if any(&["312", "309"]) {
            caps.push("Basic Switching");
        }
    } else if model.contains("rb") || model.contains("hap") {
        // Plain RB models outside the rb3/rb4/rb5 lines stay Unknown.
        if any(&["rb4", "rb3", "rb5"]) {
            device_type = DeviceType::HighPerformanceRouter;
            role = DeviceRole::EdgeRouter;
            if any(&["rb4011", "rb5009"]) {
                caps.push("Multi-core Processing");
                caps.push("10G Port");
            }
        } else if model.contains("hap") {
            device_type = DeviceType::HomeAccessPoint;
            role = DeviceRole::AccessPoint;
            caps.push("Wireless");
            if model.contains("ac") {
                caps.push("AC Wireless");
            }
            if any(&["ac2", "ac3"]) {
                caps.push("Dual-band");
            }
        }
    } else if model.contains("wap") {
        device_type = DeviceType::WirelessAccessPoint;
        role = DeviceRole::AccessPoint;
        caps.push("Wireless");
    } else if model.contains("hex") {
        device_type = DeviceType::SmallOfficeRouter;
        role = DeviceRole::EdgeRouter;
        caps.push("Compact Size");
        if model.contains('s') {
            caps.push("Layer 3 Switch");
        }
        if model.contains("lite") {
            caps.push("Budget Device");
        }
    }

    if ["6.4", "6.5", "7."].iter().any(|v| firmware.contains(v)) {
        caps.push("Latest RouterOS");
        caps.push("Container Support");
    }

    if architecture.contains("arm") {
        caps.push("ARM Architecture");
    } else if architecture.contains("mips") {
        caps.push("MIPS Architecture");
    } else if architecture.contains("powerpc") {
        caps.push("PowerPC Architecture");
    } else if architecture.contains("x86") || architecture.contains("64") {
        caps.push("x86/x64 Architecture");
    }

    DeviceClassification {
        device_type,
        role,
        capabilities: caps.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::corpus::build_corpus;
    use crate::core::model::Severity;

    fn record(topic: Topic, message: &str, ips: &[&str]) -> LogRecord {
        LogRecord {
            id: 0,
            timestamp: None,
            topic,
            severity: Severity::Info,
            message: message.to_string(),
            ip_addresses: ips.iter().map(|s| s.to_string()).collect(),
            mac_addresses: Vec::new(),
            interface: None,
            raw_log: message.to_string(),
        }
    }

    #[test]
    fn test_firmware_last_match_wins() {
        let records = vec![
            record(Topic::System, "RouterOS version 6.45 running", &[]),
            record(Topic::System, "RouterOS version 7.1 running", &[]),
        ];
        assert_eq!(resolve_device(&records).firmware_version, "7.1");
    }

    #[test]
    fn test_firmware_three_part_version_and_non_system_ignored() {
        let records = vec![
            record(Topic::System, "upgraded to RouterOS version 6.49.10", &[]),
            record(Topic::Firewall, "routeros version 9.9", &[]),
        ];
        assert_eq!(resolve_device(&records).firmware_version, "6.49.10");
    }

    #[test]
    fn test_firmware_requires_version_keyword() {
        let records = vec![record(Topic::System, "RouterOS 7.2 booted", &[])];
        assert!(resolve_device(&records).firmware_version.is_empty());
    }

    #[test]
    fn test_ip_most_frequent_excluding_denylist() {
        let records = vec![
            record(Topic::Firewall, "a", &["203.0.113.7", "203.0.113.7"]),
            record(Topic::Firewall, "b", &["198.51.100.9", "192.168.1.1"]),
            record(Topic::Other, "c", &["192.168.1.1", "192.168.1.1"]),
        ];
        assert_eq!(resolve_device(&records).ip_address, "203.0.113.7");
    }

    #[test]
    fn test_ip_tie_breaks_on_first_seen() {
        let records = vec![
            record(Topic::Other, "a", &["198.51.100.9"]),
            record(Topic::Other, "b", &["203.0.113.7"]),
        ];
        assert_eq!(resolve_device(&records).ip_address, "198.51.100.9");
    }

    #[test]
    fn test_extra_denylist_is_honoured() {
        let records = vec![record(Topic::Other, "a", &["203.0.113.7", "203.0.113.7", "198.51.100.9"])];
        let profile = resolve_device_with(&records, &["203.0.113.7".to_string()]);
        assert_eq!(profile.ip_address, "198.51.100.9");
    }

    #[test]
    fn test_model_extraction_last_match_wins() {
        let records = vec![
            record(Topic::System, "model: RB951Ui", &[]),
            record(Topic::System, "board name CCR1036-8G", &[]),
            record(Topic::System, "board: hapac lite", &[]),
            record(Topic::Wireless, "model crs326", &[]),
        ];
        assert_eq!(resolve_device(&records).model, "hapac");

        let records = vec![
            record(Topic::System, "model: RB951Ui", &[]),
            record(Topic::System, "board name CCR1036-8G", &[]),
        ];
        assert_eq!(resolve_device(&records).model, "ccr1036");
    }

    #[test]
    fn test_bare_model_code_needs_no_digit() {
        let records = vec![record(Topic::System, "board type hapac", &[])];
        assert_eq!(resolve_device(&records).model, "hapac");
    }

    #[test]
    fn test_model_ignores_words_without_model_code() {
        let records = vec![
            record(Topic::System, "model: RB4011iGS", &[]),
            // "routerboard" has no word boundary before "rb".
            record(Topic::System, "routerboard reset completed", &[]),
        ];
        assert_eq!(resolve_device(&records).model, "rb4011igs");
    }

    #[test]
    fn test_empty_corpus_resolves_empty_profile() {
        let profile = resolve_device(&Vec::<LogRecord>::new());
        assert!(profile.model.is_empty());
        assert!(profile.firmware_version.is_empty());
        assert!(profile.ip_address.is_empty());
        assert!(!profile.last_update.is_empty());
    }

    #[test]
    fn test_resolve_from_raw_text() {
        let text = "\
jan/05/2024 09:00:00 system,info RouterOS version 6.45 installed
jan/05/2024 09:00:01 system,info router model: RB4011iGS+ detected
jan/05/2024 09:05:00 firewall,info drop 203.0.113.7 -> 192.168.1.1
jan/05/2024 09:06:00 firewall,info drop 203.0.113.7 -> 10.0.0.1
jan/05/2024 10:00:00 system,info RouterOS version 7.1 installed
";
        let profile = resolve_device(&build_corpus(text));
        assert_eq!(profile.firmware_version, "7.1");
        assert_eq!(profile.model, "rb4011igs");
        assert_eq!(profile.ip_address, "203.0.113.7");
    }

    fn classify_model(model: &str, firmware: &str, arch: &str) -> DeviceClassification {
        classify(&DeviceProfile {
            model: model.to_string(),
            firmware_version: firmware.to_string(),
            architecture: arch.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_classify_ccr() {
        let c = classify_model("CCR2004-16G-2S+", "", "");
        assert_eq!(c.device_type, DeviceType::CloudCoreRouter);
        assert_eq!(c.role, DeviceRole::CoreRouter);
        assert_eq!(
            c.capabilities,
            vec!["High Performance Routing", "10G+ Ports", "Advanced Routing"]
        );
    }

    #[test]
    fn test_classify_crs_with_poe() {
        let c = classify_model("CRS328-24P-4S+", "", "");
        assert_eq!(c.device_type, DeviceType::CloudRouterSwitch);
        assert_eq!(c.role, DeviceRole::DistributionSwitch);
        assert_eq!(c.capabilities, vec!["Layer 3 Switching", "PoE Support"]);
    }

    #[test]
    fn test_classify_rb4011_with_firmware_and_arch() {
        let c = classify_model("RB4011iGS+", "7.1", "arm");
        assert_eq!(c.device_type, DeviceType::HighPerformanceRouter);
        assert_eq!(c.role, DeviceRole::EdgeRouter);
        assert_eq!(
            c.capabilities,
            vec![
                "Multi-core Processing",
                "10G Port",
                "Latest RouterOS",
                "Container Support",
                "ARM Architecture",
            ]
        );
    }

    #[test]
    fn test_classify_hap_ac2() {
        let c = classify_model("hAP ac2", "", "");
        assert_eq!(c.device_type, DeviceType::HomeAccessPoint);
        assert_eq!(c.role, DeviceRole::AccessPoint);
        assert_eq!(c.capabilities, vec!["Wireless", "AC Wireless", "Dual-band"]);
    }

    #[test]
    fn test_classify_plain_rb_stays_unknown() {
        let c = classify_model("RB951Ui", "", "mipsbe");
        assert_eq!(c.device_type, DeviceType::Unknown);
        assert_eq!(c.role, DeviceRole::Unknown);
        assert_eq!(c.capabilities, vec!["MIPS Architecture"]);
    }

    #[test]
    fn test_classify_wap_and_hex() {
        let c = classify_model("wAP ac", "", "");
        assert_eq!(c.device_type, DeviceType::WirelessAccessPoint);
        assert_eq!(c.capabilities, vec!["Wireless"]);

        let c = classify_model("hEX lite", "", "");
        assert_eq!(c.device_type, DeviceType::SmallOfficeRouter);
        assert_eq!(c.role, DeviceRole::EdgeRouter);
        assert_eq!(c.capabilities, vec!["Compact Size", "Budget Device"]);

        let c = classify_model("hEX S", "", "");
        assert_eq!(c.capabilities, vec!["Compact Size", "Layer 3 Switch"]);
    }

    #[test]
    fn test_classify_empty_profile_is_unknown() {
        let c = classify(&DeviceProfile::default());
        assert_eq!(c, DeviceClassification::default());
        assert_eq!(c.device_type.label(), "Unknown");
        assert!(c.capabilities.is_empty());
    }

    #[test]
    fn test_classify_architecture_chain_is_exclusive() {
        let c = classify_model("", "", "x86_64");
        assert_eq!(c.capabilities, vec!["x86/x64 Architecture"]);
        let c = classify_model("", "", "arm64");
        assert_eq!(c.capabilities, vec!["ARM Architecture"]);
    }
}
