//! Geography + latency bootstrap (spec.md §1: "a one-shot coordinate
//! exchange + Euclidean latency model"). Treated as a fixed-contract
//! collaborator, not part of the redesigned core — grounded directly on
//! `original_source/src/node.c`'s `assign_geography`/`exchange_latencies`.

use astp_core::Rank;
use astp_fabric::GlobalGroup;
use rand::Rng;

/// Three simulated geographic clusters, matching the original's
/// Asia/Europe/Americas centers.
const CLUSTER_CENTERS: [(f64, f64); 3] = [(100.0, 100.0), (300.0, 100.0), (500.0, 100.0)];

/// Assigns this rank to one of three geographic clusters with a small
/// jitter (spec.md §1 bootstrap; original: `rand() % 50 - 25`).
pub fn assign_geography(rank: Rank, n: usize, rng: &mut impl Rng) -> (f64, f64) {
    let cluster_size = (n / 3).max(1);
    let my_cluster = (rank / cluster_size).min(2);
    let (cx, cy) = CLUSTER_CENTERS[my_cluster];
    (cx + rng.gen_range(-25.0..25.0), cy + rng.gen_range(-25.0..25.0))
}

/// Euclidean distance converted to a latency estimate in milliseconds, with
/// +-10ms noise and a 1ms floor (original: `distance * 0.5 +- 10`, clamped).
pub fn estimate_latency_ms(a: (f64, f64), b: (f64, f64), rng: &mut impl Rng) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    let distance = (dx * dx + dy * dy).sqrt();
    let noise = rng.gen_range(-10.0..10.0);
    (distance * 0.5 + noise).max(1.0)
}

/// One-shot coordinate all-gather followed by a per-peer latency estimate
/// (spec.md §1, §6 "geography/latency bootstrap"). The self entry is left
/// unspecified per spec.md §3 ("diagonal unspecified — never self-queried")
/// but still populated so the vector stays dense and indexable by rank.
pub async fn exchange_latencies(global: &GlobalGroup, coord: (f64, f64), rng: &mut impl Rng) -> Vec<f64> {
    let all_coords = global.all_gather_coords(coord).await;
    all_coords.iter().map(|&peer_coord| estimate_latency_ms(coord, peer_coord, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ranks_spread_across_three_clusters_for_a_large_network() {
        let mut rng = StdRng::seed_from_u64(1);
        let low = assign_geography(0, 9, &mut rng);
        let mid = assign_geography(4, 9, &mut rng);
        let high = assign_geography(8, 9, &mut rng);
        assert!((low.0 - CLUSTER_CENTERS[0].0).abs() < 25.0);
        assert!((mid.0 - CLUSTER_CENTERS[1].0).abs() < 25.0);
        assert!((high.0 - CLUSTER_CENTERS[2].0).abs() < 25.0);
    }

    #[test]
    fn latency_never_drops_below_the_one_millisecond_floor() {
        let mut rng = StdRng::seed_from_u64(2);
        let same_point = estimate_latency_ms((0.0, 0.0), (0.0, 0.0), &mut rng);
        assert!(same_point >= 1.0);
    }

    #[tokio::test]
    async fn every_participant_sees_a_dense_latency_vector() {
        use astp_fabric::Fabric;
        let fabric = Fabric::new(3);
        let coords = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)];
        let mut handles = Vec::new();
        for rank in 0..3 {
            let global = fabric.global_group(rank);
            let coord = coords[rank];
            handles.push(tokio::spawn(async move {
                let mut rng = StdRng::seed_from_u64(rank as u64);
                exchange_latencies(&global, coord, &mut rng).await
            }));
        }
        for h in handles {
            let latencies = h.await.unwrap();
            assert_eq!(latencies.len(), 3);
        }
    }
}
