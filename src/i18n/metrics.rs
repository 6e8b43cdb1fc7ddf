//! Registry metrics.
//!
//! Counters for registrations, resolutions and the default-map cache. Each
//! registry owns its own set.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic counters describing registry activity.
#[derive(Debug, Default)]
pub struct RegistryMetrics {
    /// Number of registrations that added an entry
    registrations: AtomicUsize,

    /// Number of explicit resolutions
    resolutions: AtomicUsize,

    /// Number of default-map lookups served from the cache
    cache_hits: AtomicUsize,

    /// Number of default-map rebuilds
    cache_rebuilds: AtomicUsize,

    /// Number of pack callbacks invoked
    pack_loads: AtomicUsize,

    /// Number of rebuilds that fell back to the default language
    locale_fallbacks: AtomicUsize,
}

impl RegistryMetrics {
    /// Create a new metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pack registration.
    pub(crate) fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a call to `resolve`.
    pub(crate) fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a default-map lookup served from the cache.
    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rebuild of the default map.
    pub(crate) fn record_cache_rebuild(&self) {
        self.cache_rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a pack callback invocation.
    pub(crate) fn record_pack_load(&self) {
        self.pack_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a locale detection failure.
    pub(crate) fn record_locale_fallback(&self) {
        self.locale_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current registration count.
    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::Relaxed)
    }

    /// Get the current resolution count.
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    /// Get the current cache hit count.
    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    /// Get the current cache rebuild count.
    pub fn cache_rebuilds(&self) -> usize {
        self.cache_rebuilds.load(Ordering::Relaxed)
    }

    /// Get the number of pack callbacks invoked.
    pub fn pack_loads(&self) -> usize {
        self.pack_loads.load(Ordering::Relaxed)
    }

    /// Get the number of locale detection failures.
    pub fn locale_fallbacks(&self) -> usize {
        self.locale_fallbacks.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let rebuilds = self.cache_rebuilds();
        let total_lookups = hits + rebuilds;
        let cache_hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            registrations: self.registrations(),
            resolutions: self.resolutions(),
            cache_hits: hits,
            cache_rebuilds: rebuilds,
            cache_hit_rate,
            pack_loads: self.pack_loads(),
            locale_fallbacks: self.locale_fallbacks(),
        }
    }
}

/// Snapshot of registry metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub registrations: usize,
    pub resolutions: usize,
    pub cache_hits: usize,
    pub cache_rebuilds: usize,

    /// Share of default-map lookups served without a rebuild (0-100)
    pub cache_hit_rate: f64,

    pub pack_loads: usize,
    pub locale_fallbacks: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_registration() {
        let metrics = RegistryMetrics::new();
        assert_eq!(metrics.registrations(), 0);
        metrics.record_registration();
        metrics.record_registration();
        assert_eq!(metrics.registrations(), 2);
    }

    #[test]
    fn test_record_cache_activity() {
        let metrics = RegistryMetrics::new();
        metrics.record_cache_hit();
        metrics.record_cache_rebuild();
        metrics.record_pack_load();
        metrics.record_locale_fallback();
        metrics.record_resolution();

        assert_eq!(metrics.cache_hits(), 1);
        assert_eq!(metrics.cache_rebuilds(), 1);
        assert_eq!(metrics.pack_loads(), 1);
        assert_eq!(metrics.locale_fallbacks(), 1);
        assert_eq!(metrics.resolutions(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = RegistryMetrics::new().report();
        assert_eq!(report.cache_hits, 0);
        assert_eq!(report.cache_rebuilds, 0);
        assert_eq!(report.cache_hit_rate, 0.0);
    }

    #[test]
    fn test_report_cache_hit_rate() {
        let metrics = RegistryMetrics::new();

        // 3 hits, 1 rebuild = 75% hit rate
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_rebuild();

        let report = metrics.report();
        assert_eq!(report.cache_hits, 3);
        assert_eq!(report.cache_rebuilds, 1);
        assert_eq!(report.cache_hit_rate, 75.0);
    }

    #[test]
    fn test_report_serialization() {
        let metrics = RegistryMetrics::new();
        metrics.record_registration();

        let json = serde_json::to_value(metrics.report()).expect("Should serialize");
        assert_eq!(json["registrations"], 1);
        assert_eq!(json["cache_hit_rate"], 0.0);
    }
}
