//! Per-participant metrics tracking and global aggregation (spec.md §3
//! "Metrics", §6 "reduce (SUM) of scalars to rank 0").

mod summary;

pub use summary::{AggregateMetrics, MetricsSummary};

use std::collections::VecDeque;

/// Owned by exactly one participant's loop (spec.md §5 "Shared resource
/// policy"); no interior synchronisation needed since nothing else ever
/// touches it.
pub struct Metrics {
    latency_capacity: usize,
    total: u64,
    finalized: u64,
    latencies_ms: VecDeque<f64>,
    start_time: f64,
    end_time: Option<f64>,
}

impl Metrics {
    pub fn new(latency_capacity: usize) -> Self {
        Self { latency_capacity, total: 0, finalized: 0, latencies_ms: VecDeque::new(), start_time: 0.0, end_time: None }
    }

    /// Marks the experiment's start wall-time (spec.md §3 "experiment
    /// start/end wall times").
    pub fn start(&mut self, now: f64) {
        self.start_time = now;
    }

    pub fn finish(&mut self, now: f64) {
        self.end_time = Some(now);
    }

    /// spec.md §7: every generated (or received) transaction is counted,
    /// whether or not consensus ultimately runs on it.
    pub fn record_transaction(&mut self) {
        self.total += 1;
    }

    /// spec.md §3: finalization only moves the counter on consensus accept;
    /// `latency_ms` is the time from creation to finalization. Capacity
    /// exhaustion drops the sample silently (spec.md §7) while the counter
    /// keeps incrementing.
    pub fn record_finalization(&mut self, latency_ms: f64) {
        self.finalized += 1;
        if self.latencies_ms.len() < self.latency_capacity {
            self.latencies_ms.push_back(latency_ms);
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn finalized(&self) -> u64 {
        self.finalized
    }

    fn duration_secs(&self) -> f64 {
        (self.end_time.unwrap_or(self.start_time) - self.start_time).max(f64::EPSILON)
    }

    /// spec.md §3: TPS is `finalized / duration`, the same ratio the
    /// reduction step sums across ranks.
    pub fn tps(&self) -> f64 {
        self.finalized as f64 / self.duration_secs()
    }

    fn avg_latency_ms(&self) -> f64 {
        if self.latencies_ms.is_empty() {
            0.0
        } else {
            self.latencies_ms.iter().sum::<f64>() / self.latencies_ms.len() as f64
        }
    }

    /// Per-participant summary line (spec.md §6 "each rank prints a metrics line").
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total: self.total,
            finalized: self.finalized,
            tps: self.tps(),
            avg_latency_ms: self.avg_latency_ms(),
        }
    }
}
