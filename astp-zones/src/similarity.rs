use astp_core::Rank;

/// This participant's row of the similarity matrix (spec.md §4.1):
/// `sim(i,j) = W_LAT * (1 - clamp(latency[j]/LAT_MAX, 0, 1)) + W_AFF *
/// (affinity[j] / max(1, total_tx_count))`. The self-entry is left at `0.0`
/// and must never be consulted by the caller (spec.md: "self-similarity is
/// unspecified").
pub fn compute_similarity_row(
    latencies_ms: &[f64],
    affinity_counts: &[u64],
    total_tx_count: u64,
    self_rank: Rank,
    latency_weight: f64,
    affinity_weight: f64,
    latency_max_ms: f64,
) -> Vec<f64> {
    let n = latencies_ms.len();
    let denom = total_tx_count.max(1) as f64;
    (0..n)
        .map(|j| {
            if j == self_rank {
                return 0.0;
            }
            let latency_term = 1.0 - (latencies_ms[j] / latency_max_ms).clamp(0.0, 1.0);
            let affinity_term = affinity_counts[j] as f64 / denom;
            latency_weight * latency_term + affinity_weight * affinity_term
        })
        .collect()
}
