// RouterLens - app/analysis.rs
//
// One analysis session over one uploaded log body.
//
// The corpus is built exactly once; filters and statistics are computed
// on demand from shared references, so the record table is never copied
// or mutated after construction. The device profile starts as the
// inferred one and can adopt externally supplied values.

use crate::core::corpus::{build_corpus, build_corpus_parallel};
use crate::core::device::{classify, resolve_device_with};
use crate::core::filter::{filter_records, FilterCriteria};
use crate::core::model::{DeviceClassification, DeviceProfile, LogRecord};
use crate::core::stats::{aggregate_with, Stats};
use crate::platform::config::AppConfig;
use crate::util::constants::DEFAULT_TOP_IP_COUNT;

/// Knobs for building a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Parse lines on the rayon pool instead of sequentially.
    pub parallel: bool,
    pub top_ip_count: usize,
    /// Addresses excluded from device IP inference in addition to the
    /// built-in factory defaults.
    pub extra_ip_denylist: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            top_ip_count: DEFAULT_TOP_IP_COUNT,
            extra_ip_denylist: Vec::new(),
        }
    }
}

impl AnalysisOptions {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            top_ip_count: config.top_ip_count,
            extra_ip_denylist: config.extra_ip_denylist.clone(),
            ..Self::default()
        }
    }
}

/// Record table plus the device identity derived from it.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    records: Vec<LogRecord>,
    profile: DeviceProfile,
    options: AnalysisOptions,
}

impl AnalysisSession {
    /// Parse `text` into a record table and infer the device profile.
    pub fn from_text(text: &str, options: AnalysisOptions) -> Self {
        let records = if options.parallel {
            build_corpus_parallel(text)
        } else {
            build_corpus(text)
        };
        let profile = resolve_device_with(&records, &options.extra_ip_denylist);

        tracing::info!(
            records = records.len(),
            parallel = options.parallel,
            "Analysis session ready"
        );

        Self {
            records,
            profile,
            options,
        }
    }

    /// The full record table in source order.
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&LogRecord> {
        filter_records(&self.records, criteria)
    }

    /// Statistics over the records matching `criteria`.
    pub fn stats(&self, criteria: &FilterCriteria) -> Stats {
        aggregate_with(self.filter(criteria), self.options.top_ip_count)
    }

    pub fn device_profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn classification(&self) -> DeviceClassification {
        classify(&self.profile)
    }

    /// Take `external` as the device profile. Non-empty external values
    /// win; fields it leaves empty are filled from the inferred profile.
    /// `last_update` is re-stamped.
    pub fn adopt_profile(&mut self, external: DeviceProfile) {
        let mut merged = external;
        merged.merge_missing(&self.profile);
        merged.touch();

        tracing::info!(
            model = %merged.model,
            ip = %merged.ip_address,
            "External device profile adopted"
        );
        self.profile = merged;
    }
}
