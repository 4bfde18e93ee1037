use astp_core::{config::SimulatorConfig, Phase, Rank};
use astp_fabric::ZoneGroup;
use astp_zones::compute_similarity_row;

/// Per-participant state (spec.md §3 "Participant"). Lives for the whole
/// experiment; `zone_group` is replaced atomically by each rebalance
/// (spec.md: "re-formation replaces the zone_group handle atomically from
/// each participant's view") rather than mutated in place.
pub struct Participant {
    pub rank: Rank,
    pub n: usize,
    pub coord: (f64, f64),
    pub latencies_ms: Vec<f64>,
    pub affinity_counts: Vec<u64>,
    pub total_tx_count: u64,
    pub zone_id: u32,
    pub phase: Phase,
    pub zone_group: Option<ZoneGroup>,
}

impl Participant {
    pub fn new(rank: Rank, n: usize, coord: (f64, f64), latencies_ms: Vec<f64>) -> Self {
        Self {
            rank,
            n,
            coord,
            latencies_ms,
            affinity_counts: vec![0; n],
            total_tx_count: 0,
            zone_id: 0,
            phase: Phase::default(),
            zone_group: None,
        }
    }

    /// This participant's row of the similarity matrix (spec.md §4.1),
    /// recomputed fresh before every formation round since `affinity_counts`
    /// and `total_tx_count` evolve over the run.
    pub fn similarity_row(&self, cfg: &SimulatorConfig) -> Vec<f64> {
        compute_similarity_row(
            &self.latencies_ms,
            &self.affinity_counts,
            self.total_tx_count,
            self.rank,
            cfg.latency_weight,
            cfg.affinity_weight,
            cfg.latency_max_ms,
        )
    }

    pub fn avg_latency_ms(&self) -> f64 {
        if self.n <= 1 {
            return 0.0;
        }
        let sum: f64 = self.latencies_ms.iter().enumerate().filter(|&(j, _)| j != self.rank).map(|(_, &l)| l).sum();
        sum / (self.n - 1) as f64
    }

    pub fn zone_size(&self) -> usize {
        self.zone_group.as_ref().map(ZoneGroup::size).unwrap_or(1)
    }
}
