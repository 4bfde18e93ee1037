use serde::{Deserialize, Serialize};

/// One participant's metrics line (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total: u64,
    pub finalized: u64,
    pub tps: f64,
    pub avg_latency_ms: f64,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Created {} txs, Finalized {} txs, TPS={:.2}, Avg Latency={:.2} ms",
            self.total, self.finalized, self.tps, self.avg_latency_ms
        )
    }
}

/// Rank-0-only aggregate (spec.md §3 "Aggregation reduces finalized by SUM
/// and TPS by SUM across the global group at rank 0").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_tps: f64,
    pub total_finalized: u64,
}

impl std::fmt::Display for AggregateMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Total Network TPS: {:.2}\nTotal Finalized Transactions: {}", self.total_tps, self.total_finalized)
    }
}
