use crate::advisor::{map_label, Advisor, AdvisorMetrics};
use astp_core::{Algorithm, Phase};
use tracing::{debug, warn};

/// Everything the selector needs about a participant and its zone at
/// selection time (spec.md §4.3 inputs). Built fresh by the driver for each
/// selection call rather than borrowed from participant state, so the
/// selector itself stays free of any zone-group or DAG dependency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticipantSnapshot {
    pub zone_id: u32,
    pub zone_size: usize,
    pub network_size: usize,
    pub avg_latency_ms: f64,
    pub tx_count_hint: u64,
}

impl ParticipantSnapshot {
    /// spec.md §4.3: "treat zones with even zone_id as permissioned".
    pub fn is_permissioned(&self) -> bool {
        self.zone_id % 2 == 0
    }
}

/// Rule-based primary selector (spec.md §4.3 "Primary"): permissioned zones
/// always run BFT; permissionless zones route on phase.
fn select_by_rule(snapshot: &ParticipantSnapshot, phase: Phase) -> Algorithm {
    if snapshot.is_permissioned() {
        return Algorithm::Bft;
    }
    match phase {
        Phase::High => Algorithm::FastVoting,
        Phase::Normal => Algorithm::WeightedDag,
        Phase::Low => Algorithm::Bft,
    }
}

/// Select the consensus algorithm for the next transaction (spec.md §4.3).
/// When `advisor` is present, its verdict is used if (and only if) it maps
/// to one of the three known labels; any other result — `None`, an unknown
/// label, or the advisor never being installed — falls through to the
/// primary rule-based selector.
pub fn select(snapshot: &ParticipantSnapshot, phase: Phase, advisor: Option<&dyn Advisor>) -> Algorithm {
    if let Some(advisor) = advisor {
        let metrics = AdvisorMetrics::from_snapshot(
            snapshot.zone_id,
            snapshot.zone_size,
            snapshot.network_size,
            phase,
            snapshot.avg_latency_ms,
            snapshot.tx_count_hint,
        );
        match advisor.advise(&metrics).as_deref().and_then(map_label) {
            Some(algorithm) => {
                debug!(?algorithm, zone_id = snapshot.zone_id, "advisor selected algorithm");
                return algorithm;
            }
            None => warn!(zone_id = snapshot.zone_id, "advisor declined or returned an unrecognised label; falling back to rule-based selection"),
        }
    }

    let algorithm = select_by_rule(snapshot, phase);
    debug!(?algorithm, zone_id = snapshot.zone_id, ?phase, "rule-based selection");
    algorithm
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::ConstantAdvisor;

    fn snapshot(zone_id: u32) -> ParticipantSnapshot {
        ParticipantSnapshot { zone_id, zone_size: 5, network_size: 20, avg_latency_ms: 40.0, tx_count_hint: 100 }
    }

    #[test]
    fn even_zone_always_routes_to_bft_regardless_of_phase() {
        for phase in [Phase::Low, Phase::Normal, Phase::High] {
            assert_eq!(select(&snapshot(0), phase, None), Algorithm::Bft);
            assert_eq!(select(&snapshot(2), phase, None), Algorithm::Bft);
        }
    }

    #[test]
    fn odd_zone_routes_by_phase() {
        assert_eq!(select(&snapshot(1), Phase::High, None), Algorithm::FastVoting);
        assert_eq!(select(&snapshot(1), Phase::Normal, None), Algorithm::WeightedDag);
        assert_eq!(select(&snapshot(1), Phase::Low, None), Algorithm::Bft);
    }

    #[test]
    fn recognised_advisor_label_overrides_the_rule() {
        let advisor = ConstantAdvisor("fast_voting");
        // zone 1 / LOW would normally select BFT; the advisor overrides it.
        assert_eq!(select(&snapshot(1), Phase::Low, Some(&advisor)), Algorithm::FastVoting);
    }

    #[test]
    fn unrecognised_advisor_label_falls_through_to_the_rule() {
        let advisor = ConstantAdvisor("quantum_leap");
        assert_eq!(select(&snapshot(1), Phase::Low, Some(&advisor)), Algorithm::Bft);
    }
}
