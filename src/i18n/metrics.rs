//! Message factory metrics.
//!
//! Counts dictionary hits versus fallbacks to default patterns, locale loads,
//! and how many text fields each load refreshed or pruned.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by a factory and the message functions it wires.
#[derive(Debug, Default)]
pub struct FactoryMetrics {
    /// Number of lookups answered by the active dictionary
    dictionary_hits: AtomicUsize,

    /// Number of lookups that fell back to the declared default pattern
    dictionary_fallbacks: AtomicUsize,

    /// Number of successful locale loads
    locale_loads: AtomicUsize,

    /// Number of text fields rewritten by locale loads
    refreshes: AtomicUsize,

    /// Number of refreshers dropped because their field no longer exists
    pruned: AtomicUsize,
}

impl FactoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.dictionary_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.dictionary_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_locale_load(&self) {
        self.locale_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refreshes(&self, count: usize) {
        self.refreshes.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_pruned(&self, count: usize) {
        self.pruned.fetch_add(count, Ordering::Relaxed);
    }

    pub fn dictionary_hits(&self) -> usize {
        self.dictionary_hits.load(Ordering::Relaxed)
    }

    pub fn dictionary_fallbacks(&self) -> usize {
        self.dictionary_fallbacks.load(Ordering::Relaxed)
    }

    pub fn locale_loads(&self) -> usize {
        self.locale_loads.load(Ordering::Relaxed)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub fn pruned(&self) -> usize {
        self.pruned.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.dictionary_hits();
        let fallbacks = self.dictionary_fallbacks();
        let total_lookups = hits + fallbacks;
        let hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            dictionary_hits: hits,
            dictionary_fallbacks: fallbacks,
            hit_rate,
            locale_loads: self.locale_loads(),
            refreshes: self.refreshes(),
            pruned: self.pruned(),
        }
    }

    /// Reset all metrics to zero (useful for testing).
    #[cfg(test)]
    pub fn reset(&self) {
        self.dictionary_hits.store(0, Ordering::Relaxed);
        self.dictionary_fallbacks.store(0, Ordering::Relaxed);
        self.locale_loads.store(0, Ordering::Relaxed);
        self.refreshes.store(0, Ordering::Relaxed);
        self.pruned.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of factory metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub dictionary_hits: usize,
    pub dictionary_fallbacks: usize,
    /// Percentage of lookups answered by the dictionary (0.0 - 100.0)
    pub hit_rate: f64,
    pub locale_loads: usize,
    pub refreshes: usize,
    pub pruned: usize,
}
