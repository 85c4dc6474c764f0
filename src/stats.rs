//! Allocation counters and derived fragmentation/utilization metrics.
//!
//! Grounded in `stats/stats.c`: four monotonic counters updated at
//! every engine entry/exit, plus metrics computed on demand by walking
//! the active engine's current state (not maintained incrementally).

use crate::engine::Usage;

/// Raw counters, updated synchronously within the owning operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub alloc_requests: u64,
    pub alloc_success: u64,
    pub alloc_failure: u64,
    pub free_count: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_alloc_attempt(&mut self) {
        self.alloc_requests += 1;
    }

    pub fn record_alloc_success(&mut self) {
        self.alloc_success += 1;
    }

    pub fn record_alloc_failure(&mut self) {
        self.alloc_failure += 1;
    }

    pub fn record_free(&mut self) {
        self.free_count += 1;
    }

    /// `100 * alloc_success / alloc_requests`, or `0` with no requests.
    pub fn success_rate(&self) -> f64 {
        if self.alloc_requests == 0 {
            0.0
        } else {
            100.0 * self.alloc_success as f64 / self.alloc_requests as f64
        }
    }
}

/// Metrics derived on demand from the active engine's current state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedMetrics {
    pub total: usize,
    pub used_bytes: usize,
    pub free_bytes: usize,
    pub used_blocks: usize,
    pub free_blocks: usize,
    pub internal_fragmentation: usize,
    /// `100 * used / total`.
    pub utilization: f64,
    /// `1 - largest_free / total_free`, in `[0, 1)`; `0` if no free bytes.
    pub external_fragmentation: f64,
    pub success_rate: f64,
}

impl DerivedMetrics {
    pub fn compute(total: usize, usage: Usage, stats: &Stats) -> Self {
        let utilization = if total == 0 {
            0.0
        } else {
            100.0 * usage.used_bytes as f64 / total as f64
        };

        let external_fragmentation = if usage.free_bytes == 0 {
            0.0
        } else {
            1.0 - (usage.largest_free as f64 / usage.free_bytes as f64)
        };

        Self {
            total,
            used_bytes: usage.used_bytes,
            free_bytes: usage.free_bytes,
            used_blocks: usage.used_blocks,
            free_blocks: usage.free_blocks,
            internal_fragmentation: usage.internal_fragmentation,
            utilization,
            external_fragmentation,
            success_rate: stats.success_rate(),
        }
    }
}
