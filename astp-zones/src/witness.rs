use astp_core::Rank;
use std::collections::HashSet;

/// spec.md §4.1: a participant is a witness if, among peers with
/// `latency[j] < threshold_ms`, more than one distinct zone is represented.
/// Reserved for the optional cross-zone validation extension
/// (`astp_consensus::witness_validate`); never consulted by the mandatory
/// selector.
pub fn is_witness(latencies_ms: &[f64], zone_ids: &[u32], self_rank: Rank, threshold_ms: f64) -> bool {
    let mut zones_within_reach = HashSet::new();
    for (peer, &latency) in latencies_ms.iter().enumerate() {
        if peer == self_rank || latency >= threshold_ms {
            continue;
        }
        zones_within_reach.insert(zone_ids[peer]);
    }
    zones_within_reach.len() > 1
}
