use astp_core::{Algorithm, Phase};
use serde::{Deserialize, Serialize};

/// Snapshot handed to the optional external advisor (spec.md §4.3, §6
/// "Advisor interface"). Mirrors the metrics dictionary the reference
/// implementation's Python co-process receives, field for field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorMetrics {
    pub zone_id: u32,
    pub zone_size: usize,
    pub network_size: usize,
    pub phase: Phase,
    pub avg_latency_ms: f64,
    pub tx_count_hint: u64,
    pub permissioned: bool,
}

impl AdvisorMetrics {
    pub fn from_snapshot(zone_id: u32, zone_size: usize, network_size: usize, phase: Phase, avg_latency_ms: f64, tx_count_hint: u64) -> Self {
        Self { zone_id, zone_size, network_size, phase, avg_latency_ms, tx_count_hint, permissioned: zone_id % 2 == 0 }
    }
}

/// A pure function from a metrics snapshot to a consensus label, called at
/// most once per selection (spec.md §4.3: "must not block the core for more
/// than a small bounded time"). Implementations are not required — the
/// selector falls through to the rule-based default whenever no advisor is
/// installed or the advisor declines to answer.
pub trait Advisor: Send + Sync {
    /// One of "bft"/"pbft", "dag", "fast_voting"/"nakamoto", or any other
    /// string (including an empty one) to abstain.
    fn advise(&self, metrics: &AdvisorMetrics) -> Option<String>;
}

/// Maps an advisor's string verdict to an [`Algorithm`] (spec.md §4.3). Any
/// label outside this set returns `None`, which the selector treats the
/// same as an absent or failing advisor.
pub fn map_label(label: &str) -> Option<Algorithm> {
    match label {
        "bft" | "pbft" => Some(Algorithm::Bft),
        "dag" => Some(Algorithm::WeightedDag),
        "fast_voting" | "nakamoto" => Some(Algorithm::FastVoting),
        _ => None,
    }
}

/// Advisor that suggests the next-busier algorithm than the rule would, used
/// only in tests to exercise the selector's fall-through wiring.
#[cfg(test)]
pub(crate) struct ConstantAdvisor(pub &'static str);

#[cfg(test)]
impl Advisor for ConstantAdvisor {
    fn advise(&self, _metrics: &AdvisorMetrics) -> Option<String> {
        Some(self.0.to_string())
    }
}
